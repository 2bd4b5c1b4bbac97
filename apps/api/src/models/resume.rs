use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single item of a parsed section.
///
/// The upstream parser emits JSON arrays that occasionally carry nulls, numbers or nested
/// objects instead of strings. Those are kept as `Other` so the item's position survives
/// decoding; normalization turns them into empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextItem {
    Text(String),
    Other(Value),
}

impl TextItem {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TextItem::Text(s) => Some(s),
            TextItem::Other(_) => None,
        }
    }
}

impl From<&str> for TextItem {
    fn from(s: &str) -> Self {
        TextItem::Text(s.to_string())
    }
}

impl From<String> for TextItem {
    fn from(s: String) -> Self {
        TextItem::Text(s)
    }
}

/// Builds a `Vec<TextItem>` from string literals.
#[cfg(test)]
pub fn text_items<I, S>(items: I) -> Vec<TextItem>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(|s| TextItem::Text(s.into())).collect()
}

/// Structured resume as produced by the parsing collaborator. Immutable once built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StructuredResume {
    pub name: String,
    pub education: Vec<TextItem>,
    pub skills: Vec<TextItem>,
    pub projects: Vec<TextItem>,
    pub certifications: Vec<TextItem>,
    /// One statement per item; an item may still contain embedded newlines.
    pub experience: Vec<TextItem>,
    #[serde(alias = "raw_text")]
    pub raw_text: String,
}

impl StructuredResume {
    /// Experience statements split on newlines with blank lines dropped.
    /// Non-string items contribute no lines.
    pub fn experience_lines(&self) -> Vec<TextItem> {
        self.experience
            .iter()
            .filter_map(TextItem::as_text)
            .flat_map(|entry| entry.split('\n'))
            .filter(|line| !line.trim().is_empty())
            .map(TextItem::from)
            .collect()
    }
}
