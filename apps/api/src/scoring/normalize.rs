//! Text canonicalization applied to every item before comparison.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::resume::TextItem;

static STRIP_PATTERN: OnceLock<Regex> = OnceLock::new();

fn strip_pattern() -> &'static Regex {
    STRIP_PATTERN.get_or_init(|| {
        Regex::new(r"[^a-zA-Z0-9\s]").expect("normalization pattern is a valid regex")
    })
}

/// Lower-cases `text` and removes every character that is neither ASCII alphanumeric
/// nor whitespace.
pub fn normalize_text(text: &str) -> String {
    strip_pattern()
        .replace_all(&text.to_lowercase(), "")
        .into_owned()
}

/// Normalizes each item in order. Output length always equals input length;
/// non-string items become empty strings.
pub fn normalize_items(items: &[TextItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.as_text().map(normalize_text).unwrap_or_default())
        .collect()
}
