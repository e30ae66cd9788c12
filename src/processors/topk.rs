//! Top-k selection over a probability vector.

use crate::core::errors::{ClassifierError, ClassifierResult};

/// Result of top-k selection for one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct TopkResult {
    /// Class indexes, highest score first.
    pub indexes: Vec<usize>,
    /// Scores matching `indexes`.
    pub scores: Vec<f32>,
}

impl TopkResult {
    /// Iterates over `(index, score)` pairs, highest score first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indexes.iter().copied().zip(self.scores.iter().copied())
    }
}

/// Extracts the `k` highest-scoring entries of a score vector.
///
/// Ties keep the lower class index first. NaN scores sort last.
#[derive(Debug, Clone, Copy)]
pub struct Topk {
    k: usize,
}

impl Topk {
    /// Creates a top-k processor.
    ///
    /// # Errors
    ///
    /// Returns an error if `k` is 0.
    pub fn new(k: usize) -> ClassifierResult<Self> {
        if k == 0 {
            return Err(ClassifierError::config_error("k must be greater than 0"));
        }
        Ok(Self { k })
    }

    /// Selects the top `min(k, scores.len())` entries.
    pub fn process(&self, scores: &[f32]) -> ClassifierResult<TopkResult> {
        if scores.is_empty() {
            return Err(ClassifierError::post_processing_message(
                "Empty prediction vector",
            ));
        }

        let mut indexed_scores: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
        indexed_scores.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
            (false, false) => b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)),
            (nan_a, nan_b) => nan_a.cmp(&nan_b).then(a.0.cmp(&b.0)),
        });

        let (indexes, scores) = indexed_scores
            .into_iter()
            .take(self.k.min(scores.len()))
            .unzip();
        Ok(TopkResult { indexes, scores })
    }
}
