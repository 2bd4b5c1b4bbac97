use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::evaluator::{AnalysisPayloadInput, EvaluationRequest};
use crate::models::evaluation::CategorizedSuggestion;
use crate::models::{EvaluationResult, StructuredJobDescription, StructuredResume};
use crate::scoring::HardMatchBreakdown;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MatchRequest {
    pub parsed_resume: StructuredResume,
    pub parsed_job: StructuredJobDescription,
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub match_percentage: u32,
    pub breakdown: HardMatchBreakdown,
}

#[derive(Deserialize)]
pub struct SemanticMatchRequest {
    pub resume_text: String,
    pub jd_text: String,
}

#[derive(Serialize)]
pub struct SemanticMatchResponse {
    pub semantic_fit_score: u32,
}

#[derive(Deserialize)]
pub struct AggregateRequest {
    pub hard_match_score: u32,
    pub semantic_fit_score: u32,
    pub analysis_payload: AnalysisPayloadInput,
    #[serde(default)]
    pub hard_match_weight: Option<f64>,
    #[serde(default)]
    pub semantic_match_weight: Option<f64>,
}

#[derive(Serialize)]
pub struct EvaluationResponse {
    pub evaluation_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub results: EvaluationResult,
    pub suggestions_by_category: Vec<CategorizedSuggestion>,
}

/// Runs CPU-bound scoring off the async executor.
async fn run_blocking<T, F>(label: &'static str, work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in {label}: {e}")))
}

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let evaluator = state.evaluator.clone();
    let breakdown = run_blocking("hard match", move || {
        evaluator.hard_match(&req.parsed_resume, &req.parsed_job)
    })
    .await?;

    Ok(Json(MatchResponse {
        match_percentage: breakdown.score,
        breakdown,
    }))
}

/// POST /api/v1/semantic-match
pub async fn handle_semantic_match(
    State(state): State<AppState>,
    Json(req): Json<SemanticMatchRequest>,
) -> Result<Json<SemanticMatchResponse>, AppError> {
    if req.resume_text.trim().is_empty() || req.jd_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text and jd_text must not be empty".to_string(),
        ));
    }

    let evaluator = state.evaluator.clone();
    let semantic_fit_score = run_blocking("semantic match", move || {
        evaluator.semantic_fit(&req.resume_text, &req.jd_text)
    })
    .await?;

    Ok(Json(SemanticMatchResponse { semantic_fit_score }))
}

/// POST /api/v1/aggregate
pub async fn handle_aggregate(
    State(state): State<AppState>,
    Json(req): Json<AggregateRequest>,
) -> Result<Json<EvaluationResult>, AppError> {
    let result = state.evaluator.aggregate(
        req.hard_match_score,
        req.semantic_fit_score,
        &req.analysis_payload.to_text(),
        req.hard_match_weight,
        req.semantic_match_weight,
    )?;
    Ok(Json(result))
}

/// POST /api/v1/evaluations
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluationRequest>,
) -> Result<Json<EvaluationResponse>, AppError> {
    let evaluator = state.evaluator.clone();
    let results = run_blocking("evaluation", move || evaluator.evaluate(&req)).await??;

    let evaluation_id = Uuid::new_v4();
    tracing::info!(
        "Evaluation {evaluation_id}: final={} verdict={:?}",
        results.final_relevance_score,
        results.suitability_verdict
    );

    Ok(Json(EvaluationResponse {
        evaluation_id,
        evaluated_at: Utc::now(),
        suggestions_by_category: results.categorized_suggestions(),
        results,
    }))
}
