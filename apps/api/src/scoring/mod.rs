// Lexical scoring and final aggregation.
// Everything here is synchronous and side-effect free; callers on the async runtime
// should run full evaluations inside tokio::task::spawn_blocking.

pub mod aggregator;
pub mod analysis;
pub mod bm25;
pub mod fuzzy;
pub mod hard_match;
pub mod normalize;
pub mod tfidf;

pub use aggregator::{aggregate, aggregate_with, ScoringError, WeightPair};
pub use hard_match::{hard_match_breakdown, match_resume_to_job, HardMatchBreakdown, MatchPolicy};
