//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

use browser_bridge::{BrowserSettings, LoadState};

pub const PROFILE_ENV: &str = "BROWSER_BRIDGE_PROFILE";
pub const CHROME_ENV: &str = "BROWSER_BRIDGE_CHROME";
pub const LOG_FILE_ENV: &str = "BROWSER_BRIDGE_LOG_FILE";

const LOCAL_PROFILE_DIR: &str = "chrome_profile";

/// Resolve the persistent Chromium profile directory.
///
/// Order: explicit path, `BROWSER_BRIDGE_PROFILE`, `./chrome_profile` when it
/// already exists, then `~/.browser-bridge/chrome_profile`.
pub fn resolve_profile_dir(explicit: Option<&Path>) -> PathBuf {
    let env_path = std::env::var(PROFILE_ENV).ok().filter(|p| !p.is_empty());
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_profile_dir_from(explicit, env_path.as_deref(), &cwd)
}

fn resolve_profile_dir_from(explicit: Option<&Path>, env_path: Option<&str>, cwd: &Path) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(path) = env_path {
        return PathBuf::from(path);
    }

    let local = cwd.join(LOCAL_PROFILE_DIR);
    if local.is_dir() {
        return local;
    }

    resolve_default_profile_dir()
}

fn resolve_default_profile_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());

    PathBuf::from(home)
        .join(".browser-bridge")
        .join(LOCAL_PROFILE_DIR)
}

/// Resolve the optional log file: explicit path, then `BROWSER_BRIDGE_LOG_FILE`.
pub fn resolve_log_file(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        std::env::var(LOG_FILE_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    })
}

/// Command-line overrides applied on top of the default browser settings.
#[derive(Debug, Clone, Default)]
pub struct BrowserOptions {
    pub profile: Option<PathBuf>,
    pub chrome: Option<PathBuf>,
    pub headless: bool,
    pub slow_mo_ms: Option<u64>,
    pub nav_timeout_ms: Option<u64>,
    pub element_timeout_ms: Option<u64>,
    pub load_state: Option<LoadState>,
}

impl BrowserOptions {
    pub fn into_settings(self) -> BrowserSettings {
        let mut settings = BrowserSettings::new(resolve_profile_dir(self.profile.as_deref()));

        settings.executable = self.chrome.or_else(|| {
            std::env::var(CHROME_ENV)
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
        });
        settings.headless = self.headless;
        if let Some(ms) = self.slow_mo_ms {
            settings.slow_mo_ms = ms;
        }
        if let Some(ms) = self.nav_timeout_ms {
            settings.navigation_timeout_ms = ms;
        }
        if let Some(ms) = self.element_timeout_ms {
            settings.element_timeout_ms = ms;
        }
        if let Some(state) = self.load_state {
            settings.load_state = state;
        }

        settings
    }
}
