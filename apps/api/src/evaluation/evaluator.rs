//! Engine entry point. Holds the match policy, the semantic matcher and
//! the default blend weights, and runs the full pipeline:
//! hard match → semantic fit → aggregation.
//!
//! Built once at startup and carried in `AppState` as `Arc<Evaluator>`. All methods are
//! synchronous and CPU-bound.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::{EvaluationResult, StructuredJobDescription, StructuredResume};
use crate::scoring::{
    aggregate, aggregate_with, hard_match_breakdown, HardMatchBreakdown, MatchPolicy,
    ScoringError, WeightPair,
};
use crate::semantic::{CacheStats, HashingEmbedder, SemanticMatcher};

/// The external analysis as received: either its serialized text or an already-decoded
/// JSON document, which is re-serialized before decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisPayloadInput {
    Text(String),
    Structured(Value),
}

impl AnalysisPayloadInput {
    pub fn to_text(&self) -> String {
        match self {
            AnalysisPayloadInput::Text(text) => text.clone(),
            AnalysisPayloadInput::Structured(value) => value.to_string(),
        }
    }
}

/// Everything one evaluation needs. Weights fall back to the evaluator's defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    pub parsed_resume: StructuredResume,
    pub parsed_job: StructuredJobDescription,
    pub analysis_payload: AnalysisPayloadInput,
    #[serde(default)]
    pub hard_match_weight: Option<f64>,
    #[serde(default)]
    pub semantic_match_weight: Option<f64>,
}

pub struct Evaluator {
    policy: MatchPolicy,
    semantic: SemanticMatcher,
    default_weights: WeightPair,
}

impl Evaluator {
    pub fn new(policy: MatchPolicy, semantic: SemanticMatcher, default_weights: WeightPair) -> Self {
        Self {
            policy,
            semantic,
            default_weights,
        }
    }

    /// Builds the evaluator described by the service configuration, using the
    /// feature-hashing embedder.
    pub fn from_config(config: &Config) -> Self {
        let embedder = Arc::new(HashingEmbedder::new(config.embedding_dims));
        let semantic = SemanticMatcher::new(embedder, config.embedding_cache_capacity);
        info!(
            "Evaluator initialized (embedder: {}, dims: {}, cache capacity: {})",
            semantic.embedder_name(),
            semantic.embedding_dims(),
            config.embedding_cache_capacity
        );
        Self::new(config.match_policy(), semantic, config.default_weights)
    }

    /// Validates caller weights, substituting defaults for the missing ones.
    pub fn resolve_weights(
        &self,
        hard: Option<f64>,
        semantic: Option<f64>,
    ) -> Result<WeightPair, ScoringError> {
        WeightPair::new(
            hard.unwrap_or(self.default_weights.hard()),
            semantic.unwrap_or(self.default_weights.semantic()),
        )
    }

    pub fn hard_match(
        &self,
        resume: &StructuredResume,
        job: &StructuredJobDescription,
    ) -> HardMatchBreakdown {
        let breakdown = hard_match_breakdown(resume, job, &self.policy);
        debug!(
            "Hard match: must_have={:.2} skills={:.2} education={:.2} experience={:.2} -> {}",
            breakdown.must_have_fuzzy,
            breakdown.skill_blend,
            breakdown.education_fuzzy,
            breakdown.experience_blend,
            breakdown.score
        );
        breakdown
    }

    pub fn semantic_fit(&self, resume_text: &str, job_text: &str) -> u32 {
        self.semantic.semantic_fit(resume_text, job_text)
    }

    /// Blends externally computed scores. Weights are validated first.
    pub fn aggregate(
        &self,
        hard_score: u32,
        semantic_score: u32,
        analysis_payload: &str,
        hard_weight: Option<f64>,
        semantic_weight: Option<f64>,
    ) -> Result<EvaluationResult, ScoringError> {
        aggregate(
            hard_score,
            semantic_score,
            analysis_payload,
            hard_weight.unwrap_or(self.default_weights.hard()),
            semantic_weight.unwrap_or(self.default_weights.semantic()),
        )
    }

    /// Runs the full pipeline. Invalid weights are rejected before any scoring work.
    pub fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, ScoringError> {
        let weights =
            self.resolve_weights(request.hard_match_weight, request.semantic_match_weight)?;

        let hard = self.hard_match(&request.parsed_resume, &request.parsed_job).score;
        let semantic = self.semantic_fit(
            &request.parsed_resume.raw_text,
            &request.parsed_job.raw_text,
        );
        let result = aggregate_with(
            hard,
            semantic,
            &request.analysis_payload.to_text(),
            weights,
        );

        debug!(
            "Evaluation complete: hard={} semantic={} final={} verdict={:?}",
            result.hard_match_score,
            result.semantic_fit_score,
            result.final_relevance_score,
            result.suitability_verdict
        );
        Ok(result)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.semantic.cache_stats()
    }

    /// Logs cache statistics and releases cached embeddings.
    pub fn shutdown(&self) {
        let stats = self.cache_stats();
        info!(
            "Embedding cache at shutdown: {} entries, {} hits, {} misses",
            stats.entries, stats.hits, stats.misses
        );
        self.semantic.clear_cache();
    }
}
