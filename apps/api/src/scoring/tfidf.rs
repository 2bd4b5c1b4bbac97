//! Vector-space (TF-IDF) similarity between two item lists.
//!
//! The vector space is fitted over the concatenation of both sides, so document
//! frequencies reflect the vocabulary of the whole comparison. Each item becomes an
//! L2-normalized TF-IDF row; rows are summed per side and the two side vectors are
//! compared by cosine. This measures aggregate vocabulary overlap, not pairwise matching.
//!
//! Maps are `BTreeMap` so float accumulation order is fixed and results are reproducible
//! across runs.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

static TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Tokens are runs of two or more word characters, lower-cased.
fn tokenize(text: &str) -> Vec<String> {
    let pattern = TOKEN_PATTERN
        .get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));
    let lowered = text.to_lowercase();
    pattern
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

type SparseVec<'a> = BTreeMap<&'a str, f64>;

/// Returns the cosine similarity of the summed TF-IDF vectors of `a` and `b`, as a
/// percentage in `[0, 100]`. Either side empty, or no usable vocabulary, gives 0.0.
pub fn tfidf_similarity(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let docs: Vec<Vec<String>> = a.iter().chain(b.iter()).map(|d| tokenize(d)).collect();

    let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &docs {
        let unique: BTreeSet<&str> = doc.iter().map(String::as_str).collect();
        for term in unique {
            *doc_freq.entry(term).or_default() += 1;
        }
    }

    if doc_freq.is_empty() {
        return 0.0;
    }

    // Smoothed idf: ln((1 + n) / (1 + df)) + 1
    let n = docs.len() as f64;
    let idf: BTreeMap<&str, f64> = doc_freq
        .iter()
        .map(|(term, &df)| (*term, ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
        .collect();

    let mut side_a: SparseVec = BTreeMap::new();
    let mut side_b: SparseVec = BTreeMap::new();

    for (i, doc) in docs.iter().enumerate() {
        let side = if i < a.len() { &mut side_a } else { &mut side_b };
        for (term, weight) in tfidf_row(doc, &idf) {
            *side.entry(term).or_default() += weight;
        }
    }

    (cosine(&side_a, &side_b) * 100.0).clamp(0.0, 100.0)
}

/// Raw term counts scaled by idf, then L2-normalized. Empty documents give an empty row.
fn tfidf_row<'a>(doc: &'a [String], idf: &BTreeMap<&str, f64>) -> SparseVec<'a> {
    let mut row: SparseVec = BTreeMap::new();
    for term in doc {
        *row.entry(term.as_str()).or_default() += 1.0;
    }
    for (term, value) in row.iter_mut() {
        *value *= idf.get(term).copied().unwrap_or(0.0);
    }

    let norm = row.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in row.values_mut() {
            *value /= norm;
        }
    }
    row
}

fn cosine(a: &SparseVec, b: &SparseVec) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(term, x)| b.get(term).map(|y| x * y))
        .sum();
    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
