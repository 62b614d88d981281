//! HTML to Markdown conversion, metadata header and length limiting.

use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;

/// Marker appended after content cut at the length limit.
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated...]";

/// Convert HTML to Markdown: ATX headings, `-` bullets, fenced code blocks.
///
/// Script and style bodies are dropped. If the converter rejects the input,
/// the visible text is extracted with `scraper` instead.
pub fn html_to_markdown(html: &str) -> String {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "noscript", "template"])
        .options(Options {
            heading_style: HeadingStyle::Atx,
            bullet_list_marker: BulletListMarker::Dash,
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        })
        .build();

    match converter.convert(html) {
        Ok(md) => collapse_blank_lines(&md),
        Err(e) => {
            tracing::warn!("Markdown conversion failed, falling back to plain text: {e}");
            extract_text_fallback(html)
        }
    }
}

/// Header placed before extracted content when metadata is requested.
pub fn metadata_header(title: &str, url: &str) -> String {
    format!("# {title}\n\n**URL:** {url}\n\n---\n\n")
}

/// Cut `content` to at most `max_chars` characters, appending the truncation
/// marker when anything was removed.
pub fn truncate_content(content: String, max_chars: usize) -> String {
    let total = content.chars().count();
    if total <= max_chars {
        return content;
    }

    tracing::warn!("Content truncated from {total} to {max_chars} chars");
    let end = content
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(content.len());

    let mut truncated = content[..end].to_string();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// Collapse runs of blank lines to a single blank line and trim the ends.
fn collapse_blank_lines(md: &str) -> String {
    let mut result = String::with_capacity(md.len());
    let mut pending_blank = false;

    for line in md.lines() {
        if line.trim().is_empty() {
            pending_blank = true;
            continue;
        }
        if !result.is_empty() {
            result.push('\n');
            if pending_blank {
                result.push('\n');
            }
        }
        pending_blank = false;
        result.push_str(line.trim_end());
    }

    result
}

fn extract_text_fallback(html: &str) -> String {
    let document = scraper::Html::parse_document(html);
    document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
