use serde::{Deserialize, Serialize};

/// Categorical suitability label derived from the final blended score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Low,
    Medium,
    High,
}

impl Verdict {
    pub const HIGH_THRESHOLD: u32 = 80;
    pub const MEDIUM_THRESHOLD: u32 = 50;

    /// Bands are inclusive on their lower edge: ≥80 High, 50–79 Medium, else Low.
    pub fn from_score(score: u32) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Verdict::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Verdict::Medium
        } else {
            Verdict::Low
        }
    }
}

/// Outcome of one evaluation. Built once, never mutated; the caller owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub hard_match_score: u32,
    pub semantic_fit_score: u32,
    pub final_relevance_score: u32,
    pub suitability_verdict: Verdict,
    pub missing_elements: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

impl EvaluationResult {
    /// Improvement suggestions tagged with the resume area they refer to.
    pub fn categorized_suggestions(&self) -> Vec<CategorizedSuggestion> {
        self.improvement_suggestions
            .iter()
            .map(|s| CategorizedSuggestion {
                category: SuggestionCategory::classify(s),
                suggestion: s.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Skills,
    Projects,
    Certifications,
    General,
}

impl SuggestionCategory {
    /// First keyword hit wins, checked in the order skills, project, certifications.
    pub fn classify(suggestion: &str) -> Self {
        let lower = suggestion.to_lowercase();
        if lower.contains("skills") {
            SuggestionCategory::Skills
        } else if lower.contains("project") {
            SuggestionCategory::Projects
        } else if lower.contains("certifications") {
            SuggestionCategory::Certifications
        } else {
            SuggestionCategory::General
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedSuggestion {
    pub category: SuggestionCategory,
    pub suggestion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_band_edges() {
        assert_eq!(Verdict::from_score(100), Verdict::High);
        assert_eq!(Verdict::from_score(80), Verdict::High);
        assert_eq!(Verdict::from_score(79), Verdict::Medium);
        assert_eq!(Verdict::from_score(50), Verdict::Medium);
        assert_eq!(Verdict::from_score(49), Verdict::Low);
        assert_eq!(Verdict::from_score(0), Verdict::Low);
    }

    #[test]
    fn test_verdict_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Verdict::Medium).unwrap(), r#""Medium""#);
    }

    #[test]
    fn test_suggestion_classification_order() {
        assert_eq!(
            SuggestionCategory::classify("Add a Soft Skills section"),
            SuggestionCategory::Skills
        );
        assert_eq!(
            SuggestionCategory::classify("Quantify achievements in your project descriptions"),
            SuggestionCategory::Projects
        );
        assert_eq!(
            SuggestionCategory::classify("Include any Certifications related to cloud"),
            SuggestionCategory::Certifications
        );
        assert_eq!(
            SuggestionCategory::classify("Tighten the summary"),
            SuggestionCategory::General
        );
        // "skills" outranks "project" when both appear
        assert_eq!(
            SuggestionCategory::classify("List project skills"),
            SuggestionCategory::Skills
        );
    }

    #[test]
    fn test_categorized_suggestions_preserve_order() {
        let result = EvaluationResult {
            hard_match_score: 70,
            semantic_fit_score: 60,
            final_relevance_score: 65,
            suitability_verdict: Verdict::Medium,
            missing_elements: vec![],
            improvement_suggestions: vec![
                "Gain certifications in AWS".to_string(),
                "Rewrite the summary".to_string(),
            ],
        };

        let categorized = result.categorized_suggestions();
        assert_eq!(categorized.len(), 2);
        assert_eq!(categorized[0].category, SuggestionCategory::Certifications);
        assert_eq!(categorized[1].category, SuggestionCategory::General);
        assert_eq!(categorized[1].suggestion, "Rewrite the summary");
    }
}
