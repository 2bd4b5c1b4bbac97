//! Final blend of the hard-match and semantic-fit scores.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{EvaluationResult, Verdict};
use crate::scoring::analysis::decode_analysis;

/// Absorbs binary floating-point error before truncation, so 52·0.3 + 92·0.7 floors to 80.
const TRUNCATION_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("Invalid weights (hard={hard}, semantic={semantic}): each must be within [0, 1] and their sum must be greater than 0")]
    InvalidWeight { hard: f64, semantic: f64 },
}

/// Caller-supplied blend weights. Only constructible through [`WeightPair::new`], which
/// enforces the range and sum invariants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPair {
    hard: f64,
    semantic: f64,
}

impl WeightPair {
    pub const DEFAULT_HARD: f64 = 0.5;
    pub const DEFAULT_SEMANTIC: f64 = 0.5;

    pub fn new(hard: f64, semantic: f64) -> Result<Self, ScoringError> {
        let in_range = |w: f64| (0.0..=1.0).contains(&w);
        if !in_range(hard) || !in_range(semantic) || hard + semantic <= 0.0 {
            return Err(ScoringError::InvalidWeight { hard, semantic });
        }
        Ok(Self { hard, semantic })
    }

    pub fn hard(&self) -> f64 {
        self.hard
    }

    pub fn semantic(&self) -> f64 {
        self.semantic
    }

    /// Weights rescaled to sum to 1, as `(hard, semantic)`.
    pub fn normalized(&self) -> (f64, f64) {
        let total = self.hard + self.semantic;
        (self.hard / total, self.semantic / total)
    }
}

impl Default for WeightPair {
    fn default() -> Self {
        Self {
            hard: Self::DEFAULT_HARD,
            semantic: Self::DEFAULT_SEMANTIC,
        }
    }
}

/// Truncated weighted blend of two 0–100 scores. Inputs above 100 are clamped.
pub fn blend_scores(hard_score: u32, semantic_score: u32, weights: WeightPair) -> u32 {
    let (w_hard, w_semantic) = weights.normalized();
    let raw = f64::from(hard_score.min(100)) * w_hard
        + f64::from(semantic_score.min(100)) * w_semantic;
    ((raw + TRUNCATION_TOLERANCE).floor() as u32).min(100)
}

/// Validates the weights, blends the scores, assigns a verdict and extracts findings from
/// the external analysis payload. A bad payload degrades to sentinel findings; only
/// invalid weights fail.
pub fn aggregate(
    hard_score: u32,
    semantic_score: u32,
    analysis_payload: &str,
    hard_weight: f64,
    semantic_weight: f64,
) -> Result<EvaluationResult, ScoringError> {
    let weights = WeightPair::new(hard_weight, semantic_weight)?;
    Ok(aggregate_with(hard_score, semantic_score, analysis_payload, weights))
}

/// [`aggregate`] for weights that are already validated.
pub fn aggregate_with(
    hard_score: u32,
    semantic_score: u32,
    analysis_payload: &str,
    weights: WeightPair,
) -> EvaluationResult {
    let final_relevance_score = blend_scores(hard_score, semantic_score, weights);
    let (missing_elements, improvement_suggestions) =
        decode_analysis(analysis_payload).into_lists();

    EvaluationResult {
        hard_match_score: hard_score.min(100),
        semantic_fit_score: semantic_score.min(100),
        final_relevance_score,
        suitability_verdict: Verdict::from_score(final_relevance_score),
        missing_elements,
        improvement_suggestions,
    }
}
