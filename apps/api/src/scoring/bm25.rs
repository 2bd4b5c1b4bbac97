//! Probabilistic ranking (BM25 Okapi) similarity.
//!
//! The right-hand items are the document set and the left-hand items are queries. Each
//! query keeps its best document score; the sum of those maxima is normalized against a
//! heuristic ceiling of `queries × ceiling_per_query`. Because the two sides play
//! different roles the score is not commutative.
//!
//! Tokenization splits on single spaces, so doubled spaces produce empty tokens that count
//! toward document length.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// BM25 tuning and normalization constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingParams {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Document-length normalization strength.
    pub b: f64,
    /// Floor applied to negative idf values, as a fraction of the mean idf.
    pub epsilon: f64,
    /// Score one query is assumed to reach at most; used to turn sums into percentages.
    pub ceiling_per_query: f64,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            k1: 1.5,
            b: 0.75,
            epsilon: 0.25,
            ceiling_per_query: 10.0,
        }
    }
}

/// Index over a fixed document set. Built per comparison; cheap for resume-sized inputs.
pub struct Bm25Index<'a> {
    doc_freqs: Vec<HashMap<&'a str, usize>>,
    doc_lens: Vec<usize>,
    avg_doc_len: f64,
    idf: HashMap<&'a str, f64>,
    params: RankingParams,
}

impl<'a> Bm25Index<'a> {
    pub fn new(docs: &'a [String], params: RankingParams) -> Self {
        let tokenized: Vec<Vec<&str>> = docs.iter().map(|d| d.split(' ').collect()).collect();

        let doc_lens: Vec<usize> = tokenized.iter().map(Vec::len).collect();
        let total_len: usize = doc_lens.iter().sum();
        let avg_doc_len = if docs.is_empty() {
            0.0
        } else {
            total_len as f64 / docs.len() as f64
        };

        let doc_freqs: Vec<HashMap<&str, usize>> = tokenized
            .iter()
            .map(|tokens| {
                let mut freqs = HashMap::new();
                for token in tokens {
                    *freqs.entry(*token).or_insert(0) += 1;
                }
                freqs
            })
            .collect();

        // Number of documents containing each term. Ordered so the idf mean is reproducible.
        let mut containing: BTreeMap<&str, usize> = BTreeMap::new();
        for freqs in &doc_freqs {
            for term in freqs.keys() {
                *containing.entry(*term).or_insert(0) += 1;
            }
        }

        let corpus_size = docs.len() as f64;
        let mut idf = HashMap::with_capacity(containing.len());
        let mut idf_sum = 0.0;
        let mut negative = Vec::new();
        for (term, df) in &containing {
            let df = *df as f64;
            let value = (corpus_size - df + 0.5).ln() - (df + 0.5).ln();
            idf_sum += value;
            if value < 0.0 {
                negative.push(*term);
            }
            idf.insert(*term, value);
        }

        if !containing.is_empty() {
            let floor = params.epsilon * (idf_sum / containing.len() as f64);
            for term in negative {
                idf.insert(term, floor);
            }
        }

        Self {
            doc_freqs,
            doc_lens,
            avg_doc_len,
            idf,
            params,
        }
    }

    /// Scores `query` against every document, in document order.
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let RankingParams { k1, b, .. } = self.params;
        let mut scores = vec![0.0; self.doc_freqs.len()];

        for term in query.split(' ') {
            let Some(idf) = self.idf.get(term) else {
                continue;
            };
            for (i, freqs) in self.doc_freqs.iter().enumerate() {
                let tf = freqs.get(term).copied().unwrap_or(0) as f64;
                if tf == 0.0 {
                    continue;
                }
                let length_ratio = if self.avg_doc_len > 0.0 {
                    self.doc_lens[i] as f64 / self.avg_doc_len
                } else {
                    0.0
                };
                scores[i] += idf * (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * length_ratio));
            }
        }

        scores
    }

    /// Best score of `query` across all documents; 0.0 for an empty index.
    pub fn best_score(&self, query: &str) -> f64 {
        self.scores(query)
            .into_iter()
            .reduce(f64::max)
            .unwrap_or(0.0)
    }
}

/// Ranking similarity of `queries` against `documents` as a percentage in `[0, 100]`.
/// Either side empty gives 0.0.
pub fn ranking_similarity(queries: &[String], documents: &[String], params: RankingParams) -> f64 {
    if queries.is_empty() || documents.is_empty() || params.ceiling_per_query <= 0.0 {
        return 0.0;
    }

    let index = Bm25Index::new(documents, params);
    let total: f64 = queries.iter().map(|q| index.best_score(q)).sum();
    let ceiling = queries.len() as f64 * params.ceiling_per_query;

    (total / ceiling * 100.0).clamp(0.0, 100.0)
}
