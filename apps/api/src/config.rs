use std::str::FromStr;
use std::time::Duration;

use anyhow::{ensure, Context, Result};

use crate::scoring::bm25::RankingParams;
use crate::scoring::{MatchPolicy, WeightPair};
use crate::semantic::cache::DEFAULT_CACHE_CAPACITY;
use crate::semantic::embedder::DEFAULT_EMBEDDING_DIMS;

/// Application configuration loaded from environment variables.
/// Every variable has a default; startup fails if a value is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedding_dims: usize,
    pub embedding_cache_capacity: usize,
    pub request_timeout: Duration,
    pub fuzzy_threshold: f64,
    pub ranking_ceiling_per_query: f64,
    pub default_weights: WeightPair,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let embedding_dims =
            parse_or("EMBEDDING_DIMS", var("EMBEDDING_DIMS"), DEFAULT_EMBEDDING_DIMS)?;
        ensure!(embedding_dims > 0, "EMBEDDING_DIMS must be greater than 0");

        let embedding_cache_capacity = parse_or(
            "EMBEDDING_CACHE_CAPACITY",
            var("EMBEDDING_CACHE_CAPACITY"),
            DEFAULT_CACHE_CAPACITY,
        )?;
        ensure!(
            embedding_cache_capacity > 0,
            "EMBEDDING_CACHE_CAPACITY must be greater than 0"
        );

        let timeout_secs: u64 =
            parse_or("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 30)?;
        ensure!(timeout_secs > 0, "REQUEST_TIMEOUT_SECS must be greater than 0");

        let defaults = MatchPolicy::default();
        let fuzzy_threshold =
            parse_or("FUZZY_THRESHOLD", var("FUZZY_THRESHOLD"), defaults.fuzzy_threshold)?;
        ensure!(
            (0.0..=100.0).contains(&fuzzy_threshold),
            "FUZZY_THRESHOLD must be within [0, 100]"
        );

        let ranking_ceiling_per_query = parse_or(
            "RANKING_CEILING_PER_QUERY",
            var("RANKING_CEILING_PER_QUERY"),
            defaults.ranking.ceiling_per_query,
        )?;
        ensure!(
            ranking_ceiling_per_query > 0.0,
            "RANKING_CEILING_PER_QUERY must be greater than 0"
        );

        let default_weights = WeightPair::new(
            parse_or(
                "DEFAULT_HARD_MATCH_WEIGHT",
                var("DEFAULT_HARD_MATCH_WEIGHT"),
                WeightPair::DEFAULT_HARD,
            )?,
            parse_or(
                "DEFAULT_SEMANTIC_MATCH_WEIGHT",
                var("DEFAULT_SEMANTIC_MATCH_WEIGHT"),
                WeightPair::DEFAULT_SEMANTIC,
            )?,
        )
        .context("DEFAULT_HARD_MATCH_WEIGHT / DEFAULT_SEMANTIC_MATCH_WEIGHT are invalid")?;

        Ok(Config {
            port: parse_or("PORT", var("PORT"), 8080u16)
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedding_dims,
            embedding_cache_capacity,
            request_timeout: Duration::from_secs(timeout_secs),
            fuzzy_threshold,
            ranking_ceiling_per_query,
            default_weights,
        })
    }

    /// Hard-match policy with the configured overrides applied.
    pub fn match_policy(&self) -> MatchPolicy {
        let defaults = MatchPolicy::default();
        MatchPolicy {
            fuzzy_threshold: self.fuzzy_threshold,
            ranking: RankingParams {
                ceiling_per_query: self.ranking_ceiling_per_query,
                ..defaults.ranking
            },
            ..defaults
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{value}'")),
    }
}
