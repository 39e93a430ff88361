//! Class balancing
//!
//! Resamples a feature matrix and binary label vector so the positive
//! class reaches a target proportion. Only oversampling with replacement is
//! provided; majority rows are never discarded.

mod random_sampling;

pub use random_sampling::RandomOverSampler;

use crate::error::{PrepError, Result};
use ndarray::{Array1, Array2};

/// Result of resampling
#[derive(Debug, Clone)]
pub struct ResampleResult {
    /// Resampled features
    pub x: Array2<f64>,
    /// Resampled labels
    pub y: Array1<i64>,
    /// Rows added beyond the original positive count
    pub n_synthetic: usize,
}

/// Trait for samplers
pub trait Sampler {
    /// Resample data; inputs are never modified
    fn resample(&self, x: &Array2<f64>, y: &Array1<i64>) -> Result<ResampleResult>;

    /// Short name used in logs
    fn name(&self) -> &'static str {
        "sampler"
    }
}

/// Counts of a binary label vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassCounts {
    pub negative: usize,
    pub positive: usize,
}

impl ClassCounts {
    pub fn total(&self) -> usize {
        self.negative + self.positive
    }

    /// Share of positive labels; `None` for an empty vector
    pub fn positive_proportion(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            n => Some(self.positive as f64 / n as f64),
        }
    }
}

/// Count negatives and positives, rejecting any label other than 0 or 1
pub fn class_counts(y: &Array1<i64>) -> Result<ClassCounts> {
    let mut counts = ClassCounts::default();
    for (i, &label) in y.iter().enumerate() {
        match label {
            0 => counts.negative += 1,
            1 => counts.positive += 1,
            other => {
                return Err(PrepError::InvalidLabel(format!(
                    "value {} at row {} is not 0 or 1",
                    other, i
                )))
            }
        }
    }
    Ok(counts)
}

/// Row indices of negatives and positives, each in input order
pub fn class_indices(y: &Array1<i64>) -> (Vec<usize>, Vec<usize>) {
    let mut negatives = Vec::new();
    let mut positives = Vec::new();
    for (i, &label) in y.iter().enumerate() {
        if label == 1 {
            positives.push(i);
        } else {
            negatives.push(i);
        }
    }
    (negatives, positives)
}
