//! Semantic fit: embedding-space similarity between raw resume and job text.

pub mod cache;
pub mod embedder;

use std::sync::Arc;

use tracing::debug;

pub use cache::{CacheStats, EmbeddingCache};
pub use embedder::{Embedder, HashingEmbedder};

use crate::semantic::cache::CachedEmbedding;
use crate::semantic::embedder::cosine_similarity;

/// Absorbs float error so a cosine of exactly 1.0 is never reported as 99.
const PERCENT_TOLERANCE: f64 = 1e-6;

/// Owns an embedder and its cache. Constructed once at startup and shared by reference.
pub struct SemanticMatcher {
    embedder: Arc<dyn Embedder>,
    cache: EmbeddingCache,
}

impl SemanticMatcher {
    pub fn new(embedder: Arc<dyn Embedder>, cache_capacity: usize) -> Self {
        Self {
            embedder,
            cache: EmbeddingCache::new(cache_capacity),
        }
    }

    pub fn embedder_name(&self) -> &'static str {
        self.embedder.name()
    }

    pub fn embedding_dims(&self) -> usize {
        self.embedder.dims()
    }

    fn embedding(&self, text: &str) -> CachedEmbedding {
        if text.trim().is_empty() {
            return None;
        }
        self.cache
            .get_or_compute(text, |t| self.embedder.embed(t))
    }

    /// Cosine similarity of the two texts' embeddings as a truncated percentage in
    /// `[0, 100]`. Returns 0 when either embedding is unavailable.
    pub fn semantic_fit(&self, resume_text: &str, job_text: &str) -> u32 {
        let (Some(resume), Some(job)) = (self.embedding(resume_text), self.embedding(job_text))
        else {
            debug!("Semantic fit skipped: embedding unavailable");
            return 0;
        };

        let similarity = cosine_similarity(&resume, &job);
        let score = ((similarity * 100.0 + PERCENT_TOLERANCE).floor()).clamp(0.0, 100.0) as u32;
        debug!("Semantic fit: cosine={similarity:.4} score={score}");
        score
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Releases all cached embeddings.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and delegates to the hashing embedder.
    struct CountingEmbedder {
        inner: HashingEmbedder,
        calls: AtomicUsize,
    }

    impl Embedder for CountingEmbedder {
        fn embed(&self, text: &str) -> Option<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed(text)
        }

        fn dims(&self) -> usize {
            self.inner.dims()
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    /// Returns fixed vectors keyed on the first word.
    struct FixedEmbedder;

    impl Embedder for FixedEmbedder {
        fn embed(&self, text: &str) -> Option<Vec<f32>> {
            match text.split_whitespace().next()? {
                "east" => Some(vec![1.0, 0.0]),
                "north" => Some(vec![0.0, 1.0]),
                "west" => Some(vec![-1.0, 0.0]),
                "northeast" => Some(vec![1.0, 1.0]),
                _ => None,
            }
        }

        fn dims(&self) -> usize {
            2
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn matcher() -> SemanticMatcher {
        SemanticMatcher::new(Arc::new(HashingEmbedder::default()), 16)
    }

    #[test]
    fn test_identical_text_scores_100() {
        let text = "Senior Python engineer with Flask, NLP and machine learning experience.";
        assert_eq!(matcher().semantic_fit(text, text), 100);
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let m = matcher();
        assert_eq!(m.semantic_fit("", "python engineer"), 0);
        assert_eq!(m.semantic_fit("python engineer", "   "), 0);
    }

    #[test]
    fn test_unrelated_text_scores_lower_than_related() {
        let m = matcher();
        let resume = "python flask backend services and machine learning models";
        let related = m.semantic_fit(resume, "backend engineer: python, flask, machine learning");
        let unrelated = m.semantic_fit(resume, "pastry chef for a french bakery");
        assert!(related > unrelated, "related={related} unrelated={unrelated}");
    }

    #[test]
    fn test_known_angles() {
        let m = SemanticMatcher::new(Arc::new(FixedEmbedder), 8);
        assert_eq!(m.semantic_fit("east", "east"), 100);
        assert_eq!(m.semantic_fit("east", "north"), 0);
        // cos 45° = 0.7071 -> 70
        assert_eq!(m.semantic_fit("east", "northeast"), 70);
        // negative similarity is clamped
        assert_eq!(m.semantic_fit("east", "west"), 0);
        // embedder declines -> 0
        assert_eq!(m.semantic_fit("east", "unknown"), 0);
    }

    #[test]
    fn test_repeated_texts_hit_the_cache() {
        let embedder = Arc::new(CountingEmbedder {
            inner: HashingEmbedder::default(),
            calls: AtomicUsize::new(0),
        });
        let m = SemanticMatcher::new(embedder.clone(), 16);

        m.semantic_fit("resume text here", "job text here");
        m.semantic_fit("resume text here", "job text here");
        m.semantic_fit("resume text here", "another job");

        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
        let stats = m.cache_stats();
        assert_eq!(stats.misses, 3);
        assert_eq!(stats.hits, 3);
    }

    #[test]
    fn test_clear_cache_forces_recomputation() {
        let embedder = Arc::new(CountingEmbedder {
            inner: HashingEmbedder::default(),
            calls: AtomicUsize::new(0),
        });
        let m = SemanticMatcher::new(embedder.clone(), 16);

        m.semantic_fit("resume", "job posting");
        m.clear_cache();
        m.semantic_fit("resume", "job posting");

        assert_eq!(embedder.calls.load(Ordering::SeqCst), 4);
    }
}
