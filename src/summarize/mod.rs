//! HTML summarization and truncation
//!
//! Bounds the size of captured HTML: under the size threshold, oversized
//! payload attributes (vector path data, inline styles, class soup) are
//! replaced with short placeholders; at or above it, the markup is parsed
//! into a detached tree and repeated sibling groups are collapsed. Large
//! structural "main containers" get a statistics-led summary instead of
//! full markup.
//!
//! Failure policy: a fragment that cannot be rebuilt falls back to regex
//! attribute truncation plus a hard cut with an explicit marker. Nothing in
//! this module returns an error.

mod collapse;
mod container;

pub use container::{container_stats, container_summary, is_main_container};

use once_cell::sync::Lazy;
use regex::Regex;

/// HTML at or above this many characters goes through tree collapse
pub const SIZE_THRESHOLD: usize = 5_000;

/// Sibling groups larger than this keep only the first `GROUP_LIMIT` members
pub const GROUP_LIMIT: usize = 5;

/// Marker appended when markup had to be cut without structure
const HARD_TRUNCATION_MARKER: &str = "\n<!-- ... content truncated ... -->";

static RE_LONG_PATH_DATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#" d="[^"]{200,}""#).expect("path data pattern is valid"));
static RE_LONG_PATH_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#" path="[^"]{200,}""#).expect("path attr pattern is valid"));
static RE_LONG_POINTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#" points="[^"]{200,}""#).expect("points pattern is valid"));
static RE_LONG_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#" style="[^"]{300,}""#).expect("style pattern is valid"));
static RE_LONG_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#" class="[^"]{200,}""#).expect("class pattern is valid"));

/// Replace oversized payload attribute values with short placeholders,
/// preserving tag structure. Never grows the input.
pub fn truncate_attributes(html: &str) -> String {
    let html = RE_LONG_PATH_DATA.replace_all(html, r#" d="M0,0""#);
    let html = RE_LONG_PATH_ATTR.replace_all(&html, r#" path="M0,0""#);
    let html = RE_LONG_POINTS.replace_all(&html, r#" points="0,0""#);
    let html = RE_LONG_STYLE.replace_all(&html, r#" style="/* truncated */""#);
    let html = RE_LONG_CLASS.replace_all(&html, r#" class="truncated""#);
    html.into_owned()
}

/// Bound the size of a captured HTML snippet.
///
/// Under [`SIZE_THRESHOLD`] only attribute payloads are truncated; at or
/// above it the markup is collapsed structurally. The output never exceeds
/// the input length for inputs at or above the threshold.
pub fn clean_html(html: &str) -> String {
    if html.len() < SIZE_THRESHOLD {
        return truncate_attributes(html);
    }

    match collapse::collapse_html(html) {
        Some(collapsed) if collapsed.len() <= html.len() => collapsed,
        _ => hard_truncate(&truncate_attributes(html), SIZE_THRESHOLD),
    }
}

/// Cut a string to at most `limit` characters total, marker included,
/// respecting UTF-8 boundaries
pub(crate) fn hard_truncate(html: &str, limit: usize) -> String {
    if html.len() <= limit {
        return html.to_string();
    }
    let budget = limit.saturating_sub(HARD_TRUNCATION_MARKER.len());
    let mut cut = budget.min(html.len());
    while cut > 0 && !html.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", &html[..cut], HARD_TRUNCATION_MARKER)
}

/// Truncate at a char boundary at or below `max_bytes`
pub(crate) fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut cut = max_bytes;
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    &s[..cut]
}
