//! Similar-learner search over historical results.
//!
//! Results are compared as fixed-length area-score vectors read in the
//! canonical area order, with 0.0 substituted for areas a result never
//! attempted; the zero-fill is what makes vectors from different sessions
//! comparable at all. Each dimension is standardized over the corpus plus
//! the current result before taking cosine similarity, so an area with a
//! naturally wide score spread cannot dominate the distance.

use learnscope_model::{KnowledgeArea, QuizResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::EngineConfig;

/// A historical learner judged similar to the current one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarLearner {
    /// Session identifier of the similar historical result.
    pub session_id: String,
    /// Cosine similarity used for thresholding.
    pub similarity: f64,
}

/// Find up to `config.max_similar` historical results similar to `current`.
///
/// Only results strictly above `config.similarity_threshold` qualify;
/// fewer qualifying results simply yield a shorter list. A corpus of fewer
/// than 2 historical results returns an empty list immediately, and every
/// numerical edge case (zero-variance dimensions, zero-norm vectors)
/// degrades to "no similar learners" rather than an error.
pub fn find_similar_learners(
    current: &QuizResult,
    corpus: &[QuizResult],
    config: &EngineConfig,
) -> Vec<SimilarLearner> {
    if corpus.len() < 2 {
        return Vec::new();
    }

    // Corpus rows first, current result last.
    let mut rows: Vec<Vec<f64>> = corpus.iter().map(feature_vector).collect();
    rows.push(feature_vector(current));
    standardize(&mut rows);

    let current_row = rows
        .last()
        .cloned()
        .unwrap_or_else(|| vec![0.0; KnowledgeArea::ALL.len()]);

    let mut scored: Vec<(usize, f64)> = rows[..corpus.len()]
        .iter()
        .enumerate()
        .map(|(idx, row)| (idx, cosine_similarity(&current_row, row)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let similar: Vec<SimilarLearner> = scored
        .into_iter()
        .take(config.max_similar)
        .filter(|&(_, similarity)| similarity > config.similarity_threshold)
        .map(|(idx, similarity)| SimilarLearner {
            session_id: corpus[idx].session_id.clone(),
            similarity,
        })
        .collect();
    debug!(
        session = %current.session_id,
        corpus = corpus.len(),
        similar = similar.len(),
        "similar-learner search"
    );
    similar
}

/// Fixed-length score vector in canonical area order, zero-filled for
/// areas absent from the result.
pub fn feature_vector(result: &QuizResult) -> Vec<f64> {
    KnowledgeArea::ALL
        .iter()
        .map(|area| result.area_scores.get(area).copied().unwrap_or(0.0))
        .collect()
}

/// Standardize each dimension to zero mean and unit variance across all
/// rows. A zero-variance dimension carries no signal and is zeroed instead
/// of propagating a division failure.
fn standardize(rows: &mut [Vec<f64>]) {
    if rows.is_empty() {
        return;
    }
    let n = rows.len() as f64;
    let dims = rows[0].len();
    for d in 0..dims {
        let mean = rows.iter().map(|row| row[d]).sum::<f64>() / n;
        let variance = rows.iter().map(|row| (row[d] - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        for row in rows.iter_mut() {
            row[d] = if std_dev > f64::EPSILON {
                (row[d] - mean) / std_dev
            } else {
                0.0
            };
        }
    }
}

/// Cosine similarity; zero-norm vectors yield 0.0 rather than NaN.
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a <= f64::EPSILON || norm_b <= f64::EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
