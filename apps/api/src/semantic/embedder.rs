//! Embedding backends.
//!
//! `Embedder` is the seam for dense text embeddings. The default `HashingEmbedder` is a
//! deterministic feature-hashing model with no external weights: every unigram and bigram
//! is hashed (SHA-256) into a few signed buckets and the result is L2-normalized. A
//! model-backed embedder plugs in behind the same trait.

use sha2::{Digest, Sha256};

/// Default dimensionality, matching common sentence-embedding models.
pub const DEFAULT_EMBEDDING_DIMS: usize = 384;

/// Buckets touched per hashed feature.
const BUCKETS_PER_FEATURE: usize = 4;
const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;

/// Maps text to a fixed-length vector. Must be deterministic: the embedding cache relies
/// on identical text always producing an identical vector.
pub trait Embedder: Send + Sync {
    /// `None` when no embedding can be produced (e.g. no usable tokens).
    fn embed(&self, text: &str) -> Option<Vec<f32>>;
    fn dims(&self) -> usize;
    /// Short label for logs.
    fn name(&self) -> &'static str;
}

pub struct HashingEmbedder {
    dims: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIMS)
    }
}

impl HashingEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }

    fn accumulate(&self, embedding: &mut [f32], feature: &str, weight: f32) {
        let digest = Sha256::digest(feature.as_bytes());
        for chunk in digest.chunks_exact(8).take(BUCKETS_PER_FEATURE) {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            let h = u64::from_le_bytes(bytes);
            let sign = if h & 1 == 0 { weight } else { -weight };
            embedding[((h >> 1) % self.dims as u64) as usize] += sign;
        }
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Option<Vec<f32>> {
        if self.dims == 0 {
            return None;
        }

        let tokens = tokenize(text);
        if tokens.is_empty() {
            return None;
        }

        let mut embedding = vec![0.0_f32; self.dims];
        for token in &tokens {
            self.accumulate(&mut embedding, token, UNIGRAM_WEIGHT);
        }
        for pair in tokens.windows(2) {
            self.accumulate(&mut embedding, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            return None;
        }
        for value in embedding.iter_mut() {
            *value /= norm;
        }
        Some(embedding)
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &'static str {
        "hashing"
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Cosine similarity of two vectors, computed in f64. Mismatched lengths or a zero
/// vector give 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}
