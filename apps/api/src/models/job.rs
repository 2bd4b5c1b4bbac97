use serde::{Deserialize, Serialize};

use crate::models::resume::TextItem;

/// Structured job description as produced by the parsing collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StructuredJobDescription {
    #[serde(alias = "Role Title")]
    pub role_title: String,
    pub must_have_skills: Vec<TextItem>,
    pub good_to_have_skills: Vec<TextItem>,
    pub required_qualifications: Vec<TextItem>,
    #[serde(alias = "raw_text")]
    pub raw_text: String,
}

impl StructuredJobDescription {
    /// Must-have followed by good-to-have skills, in that order.
    pub fn all_skills(&self) -> Vec<TextItem> {
        self.must_have_skills
            .iter()
            .chain(self.good_to_have_skills.iter())
            .cloned()
            .collect()
    }
}
