//! Deadline-bounded polling used for selector, URL and readiness waits.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::types::{BridgeError, BridgeResult};

/// Interval between two checks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Poll `check` until it reports `true` or `timeout` elapses.
///
/// Check errors count as "not yet": pages that are mid-navigation routinely
/// fail evaluation for a moment. The last error is logged at debug level.
pub async fn poll_until<F, Fut>(timeout: Duration, what: &str, mut check: F) -> BridgeResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = BridgeResult<bool>>,
{
    let started = Instant::now();

    loop {
        match check().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => tracing::debug!("Check for {what} failed: {e}"),
        }

        if started.elapsed() >= timeout {
            return Err(BridgeError::Timeout {
                waited_ms: timeout.as_millis() as u64,
                what: what.to_string(),
            });
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Time remaining until `deadline`, zero once it has passed.
pub fn time_left(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}
