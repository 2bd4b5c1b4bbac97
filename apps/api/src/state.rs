use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::Evaluator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Scoring engine, including the embedding cache shared by every request.
    pub evaluator: Arc<Evaluator>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let evaluator = Arc::new(Evaluator::from_config(&config));
        Self { config, evaluator }
    }
}
