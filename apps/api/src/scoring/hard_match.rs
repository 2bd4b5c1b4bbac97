//! Hard-match score: lexical and structural overlap between a resume and a job, 0–100.
//!
//! Four components, each a percentage:
//! 1. fuzzy match of resume skills against must-have skills
//! 2. TF-IDF / BM25 blend of resume skills against all job skills
//! 3. fuzzy match of education against required qualifications
//! 4. TF-IDF / BM25 blend of experience lines against required qualifications
//!
//! The final score is their weighted mean, truncated and capped at 100.

use serde::{Deserialize, Serialize};

use crate::models::{StructuredJobDescription, StructuredResume};
use crate::scoring::bm25::{ranking_similarity, RankingParams};
use crate::scoring::fuzzy::{fuzzy_match_rate, DEFAULT_FUZZY_THRESHOLD};
use crate::scoring::normalize::normalize_items;
use crate::scoring::tfidf::tfidf_similarity;

/// Weights and constants of the hard-match policy. Defaults reproduce the production
/// policy; every field can be overridden by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPolicy {
    pub must_have_weight: f64,
    pub skill_blend_weight: f64,
    pub education_weight: f64,
    pub experience_weight: f64,
    /// Share of the TF-IDF score in each lexical blend; BM25 gets the rest.
    pub tfidf_share: f64,
    /// Minimum edit similarity (0–100) for a fuzzy match.
    pub fuzzy_threshold: f64,
    pub ranking: RankingParams,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            must_have_weight: 0.40,
            skill_blend_weight: 0.30,
            education_weight: 0.15,
            experience_weight: 0.15,
            tfidf_share: 0.5,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            ranking: RankingParams::default(),
        }
    }
}

impl MatchPolicy {
    fn total_weight(&self) -> f64 {
        self.must_have_weight
            + self.skill_blend_weight
            + self.education_weight
            + self.experience_weight
    }

    fn blend(&self, items: &[String], targets: &[String]) -> f64 {
        let tfidf = tfidf_similarity(items, targets);
        let ranking = ranking_similarity(items, targets, self.ranking);
        tfidf * self.tfidf_share + ranking * (1.0 - self.tfidf_share)
    }
}

/// Component scores behind a hard-match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardMatchBreakdown {
    pub must_have_fuzzy: f64,
    pub skill_blend: f64,
    pub education_fuzzy: f64,
    pub experience_blend: f64,
    pub score: u32,
}

/// Computes every component and the final hard-match score.
pub fn hard_match_breakdown(
    resume: &StructuredResume,
    job: &StructuredJobDescription,
    policy: &MatchPolicy,
) -> HardMatchBreakdown {
    let skills = normalize_items(&resume.skills);
    let education = normalize_items(&resume.education);
    let experience = normalize_items(&resume.experience_lines());

    let must_have = normalize_items(&job.must_have_skills);
    let all_job_skills = normalize_items(&job.all_skills());
    let qualifications = normalize_items(&job.required_qualifications);

    let must_have_fuzzy = fuzzy_match_rate(&skills, &must_have, policy.fuzzy_threshold);
    let skill_blend = policy.blend(&skills, &all_job_skills);
    let education_fuzzy = fuzzy_match_rate(&education, &qualifications, policy.fuzzy_threshold);
    let experience_blend = policy.blend(&experience, &qualifications);

    let weighted_sum = must_have_fuzzy * policy.must_have_weight
        + skill_blend * policy.skill_blend_weight
        + education_fuzzy * policy.education_weight
        + experience_blend * policy.experience_weight;

    let total_weight = policy.total_weight();
    let score = if total_weight > 0.0 {
        ((weighted_sum / total_weight).max(0.0) as u32).min(100)
    } else {
        0
    };

    HardMatchBreakdown {
        must_have_fuzzy,
        skill_blend,
        education_fuzzy,
        experience_blend,
        score,
    }
}

/// Hard-match score in `[0, 100]`.
pub fn match_resume_to_job(
    resume: &StructuredResume,
    job: &StructuredJobDescription,
    policy: &MatchPolicy,
) -> u32 {
    hard_match_breakdown(resume, job, policy).score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::text_items;

    fn sample_resume() -> StructuredResume {
        StructuredResume {
            name: "John Doe".to_string(),
            education: text_items([
                "University of ABC - Bachelor of Science in Computer Science",
            ]),
            skills: text_items([
                "Python",
                "Flask",
                "NLP",
                "Machine Learning",
                "TensorFlow",
                "Keras",
                "Data Analysis",
            ]),
            experience: text_items([
                "Software Engineer - Company X (2020-Present)",
                "Developed and maintained backend services using Python and Flask.",
                "Implemented machine learning models for data prediction.",
            ]),
            raw_text: "John Doe Python Flask NLP".to_string(),
            ..Default::default()
        }
    }

    fn sample_job() -> StructuredJobDescription {
        StructuredJobDescription {
            role_title: "Software Engineer".to_string(),
            must_have_skills: text_items(["Python", "Flask", "NLP", "Machine Learning"]),
            good_to_have_skills: text_items(["TensorFlow", "AWS"]),
            required_qualifications: text_items([
                "Bachelor's degree in Computer Science or related field",
                "3+ years of experience in backend development",
                "Proficiency in Python and web frameworks",
            ]),
            raw_text: "Software Engineer Python Flask".to_string(),
        }
    }

    #[test]
    fn test_sample_pair_scores_in_range_with_expected_components() {
        let breakdown =
            hard_match_breakdown(&sample_resume(), &sample_job(), &MatchPolicy::default());

        // 4 of 7 resume skills appear verbatim among the must-haves
        assert!((breakdown.must_have_fuzzy - 400.0 / 7.0).abs() < 1e-9);
        assert!(breakdown.skill_blend > 0.0);
        assert!(breakdown.experience_blend > 0.0);
        assert!(breakdown.score > 0 && breakdown.score <= 100);
    }

    #[test]
    fn test_empty_records_score_zero() {
        let breakdown = hard_match_breakdown(
            &StructuredResume::default(),
            &StructuredJobDescription::default(),
            &MatchPolicy::default(),
        );
        assert_eq!(breakdown.score, 0);
        assert_eq!(breakdown.must_have_fuzzy, 0.0);
        assert_eq!(breakdown.skill_blend, 0.0);
    }

    #[test]
    fn test_zero_weights_score_zero() {
        let policy = MatchPolicy {
            must_have_weight: 0.0,
            skill_blend_weight: 0.0,
            education_weight: 0.0,
            experience_weight: 0.0,
            ..MatchPolicy::default()
        };
        assert_eq!(match_resume_to_job(&sample_resume(), &sample_job(), &policy), 0);
    }

    #[test]
    fn test_weights_are_normalized_by_their_sum() {
        // Only the must-have component counts, and its weight is not 1.0
        let policy = MatchPolicy {
            must_have_weight: 2.0,
            skill_blend_weight: 0.0,
            education_weight: 0.0,
            experience_weight: 0.0,
            ..MatchPolicy::default()
        };
        // 400 / 7 = 57.14 -> 57
        assert_eq!(match_resume_to_job(&sample_resume(), &sample_job(), &policy), 57);
    }

    #[test]
    fn test_identical_skill_lists_hit_full_must_have_score() {
        let resume = StructuredResume {
            skills: text_items(["Rust", "Tokio"]),
            ..Default::default()
        };
        let job = StructuredJobDescription {
            must_have_skills: text_items(["rust", "TOKIO"]),
            ..Default::default()
        };
        let breakdown = hard_match_breakdown(&resume, &job, &MatchPolicy::default());
        assert_eq!(breakdown.must_have_fuzzy, 100.0);
    }

    #[test]
    fn test_non_string_skills_do_not_match() {
        let mut resume = sample_resume();
        resume.skills = vec![serde_json::json!(null), serde_json::json!(7)]
            .into_iter()
            .map(crate::models::TextItem::Other)
            .collect();
        let breakdown = hard_match_breakdown(&resume, &sample_job(), &MatchPolicy::default());
        assert_eq!(breakdown.must_have_fuzzy, 0.0);
    }
}
