//! Random oversampling towards a target positive proportion

use crate::error::{PrepError, Result};
use crate::preprocessing::{CleaningConfig, DEFAULT_TARGET_PROPORTION};
use crate::synthetic::{class_counts, class_indices, ResampleResult, Sampler};
use ndarray::{concatenate, Array1, Array2, Axis};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Random oversampler (duplicates positive rows with replacement)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomOverSampler {
    /// Target share of positive rows, within [0, 1)
    target_proportion: f64,
    /// Random seed
    seed: Option<u64>,
}

impl RandomOverSampler {
    /// Create new random oversampler; the proportion is checked on resample
    pub fn new(target_proportion: f64) -> Self {
        Self {
            target_proportion,
            seed: None,
        }
    }

    /// Sampler for a cleaning configuration's target proportion and seed
    pub fn from_config(config: &CleaningConfig) -> Self {
        let sampler = Self::new(config.target_proportion);
        match config.seed {
            Some(seed) => sampler.with_seed(seed),
            None => sampler,
        }
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn target_proportion(&self) -> f64 {
        self.target_proportion
    }

    /// Positive rows needed so that positives make up the target share
    /// next to `neg_count` negatives.
    pub fn target_positive_count(&self, neg_count: usize) -> usize {
        let tp = self.target_proportion;
        (tp * neg_count as f64 / (1.0 - tp)).floor() as usize
    }

    fn validate_proportion(&self) -> Result<()> {
        let tp = self.target_proportion;
        if tp.is_finite() && (0.0..1.0).contains(&tp) {
            Ok(())
        } else {
            Err(PrepError::InvalidProportion(tp))
        }
    }

    fn unchanged(x: &Array2<f64>, y: &Array1<i64>) -> ResampleResult {
        ResampleResult {
            x: x.clone(),
            y: y.clone(),
            n_synthetic: 0,
        }
    }
}

impl Default for RandomOverSampler {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_PROPORTION)
    }
}

impl Sampler for RandomOverSampler {
    /// Resampled positives come first, followed by every negative row in
    /// input order. Inputs already at or above the target are returned
    /// unchanged.
    fn resample(&self, x: &Array2<f64>, y: &Array1<i64>) -> Result<ResampleResult> {
        self.validate_proportion()?;

        if x.nrows() != y.len() {
            return Err(PrepError::ShapeError {
                expected: format!("{} rows to match labels", y.len()),
                actual: format!("{} rows", x.nrows()),
            });
        }

        let counts = class_counts(y)?;
        let proportion = match counts.positive_proportion() {
            Some(p) => p,
            None => return Ok(Self::unchanged(x, y)),
        };

        if proportion >= self.target_proportion {
            debug!(
                sampler = self.name(),
                proportion,
                target = self.target_proportion,
                "Already balanced, skipping"
            );
            return Ok(Self::unchanged(x, y));
        }

        let target_count = self.target_positive_count(counts.negative);
        if counts.positive == 0 && target_count > 0 {
            return Err(PrepError::EmptyClass {
                class: 1,
                requested: target_count,
            });
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (neg_idx, pos_idx) = class_indices(y);
        let drawn: Vec<usize> = (0..target_count)
            .map(|_| pos_idx[rng.gen_range(0..pos_idx.len())])
            .collect();

        let x_pos = x.select(Axis(0), &drawn);
        let x_neg = x.select(Axis(0), &neg_idx);
        let result_x = concatenate(Axis(0), &[x_pos.view(), x_neg.view()])?;

        let mut result_y = vec![1i64; target_count];
        result_y.extend(std::iter::repeat(0i64).take(neg_idx.len()));

        debug!(
            sampler = self.name(),
            positives = counts.positive,
            negatives = counts.negative,
            drawn = target_count,
            "Oversampled positive class"
        );

        Ok(ResampleResult {
            x: result_x,
            y: Array1::from_vec(result_y),
            n_synthetic: target_count.saturating_sub(counts.positive),
        })
    }

    fn name(&self) -> &'static str {
        "random_over_sampler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_imbalanced_data() -> (Array2<f64>, Array1<i64>) {
        let mut data = Vec::new();
        let mut labels = Vec::new();

        for i in 0..30 {
            data.push((i % 6) as f64);
            data.push((i / 6) as f64);
            labels.push(0i64);
        }

        for i in 0..5 {
            data.push(10.0 + (i % 3) as f64);
            data.push(10.0 + (i / 3) as f64);
            labels.push(1i64);
        }

        let x = Array2::from_shape_vec((35, 2), data).unwrap();
        let y = Array1::from_vec(labels);

        (x, y)
    }

    #[test]
    fn test_single_positive_scenario() {
        let x = array![[0.0, 1.0], [1.0, 1.0], [2.0, 1.0], [3.0, 1.0], [9.0, 9.0]];
        let y = Array1::from_vec(vec![0, 0, 0, 0, 1]);

        let result = RandomOverSampler::new(0.5).resample(&x, &y).unwrap();

        assert_eq!(result.x.nrows(), 8);
        assert_eq!(result.y.to_vec(), vec![1, 1, 1, 1, 0, 0, 0, 0]);
        for i in 0..4 {
            assert_eq!(result.x.row(i).to_vec(), vec![9.0, 9.0]);
        }
        // negatives follow in input order
        assert_eq!(result.x.row(4).to_vec(), vec![0.0, 1.0]);
        assert_eq!(result.x.row(7).to_vec(), vec![3.0, 1.0]);
        assert_eq!(result.n_synthetic, 3);
    }

    #[test]
    fn test_already_balanced_is_unchanged() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = Array1::from_vec(vec![1, 0, 1, 0]);

        let result = RandomOverSampler::new(0.3).resample(&x, &y).unwrap();
        assert_eq!(result.x, x);
        assert_eq!(result.y, y);
        assert_eq!(result.n_synthetic, 0);
    }

    #[test]
    fn test_proportion_and_row_count() {
        let (x, y) = create_imbalanced_data();

        for &tp in &[0.2, 0.3, 0.5, 0.75] {
            let sampler = RandomOverSampler::new(tp).with_seed(42);
            let result = sampler.resample(&x, &y).unwrap();

            let target = sampler.target_positive_count(30);
            assert_eq!(result.x.nrows(), target + 30);
            assert_eq!(result.y.len(), target + 30);

            let counts = class_counts(&result.y).unwrap();
            assert_eq!(counts.negative, 30);
            assert_eq!(counts.positive, target);

            let achieved = counts.positive_proportion().unwrap();
            assert!((achieved - tp).abs() < 1.0 / 30.0, "tp {} achieved {}", tp, achieved);
        }
    }

    #[test]
    fn test_drawn_rows_come_from_positives() {
        let (x, y) = create_imbalanced_data();
        let result = RandomOverSampler::new(0.5).with_seed(7).resample(&x, &y).unwrap();

        for (row, &label) in result.x.rows().into_iter().zip(result.y.iter()) {
            if label == 1 {
                assert!(row[0] >= 10.0 && row[1] >= 10.0);
            }
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let (x, y) = create_imbalanced_data();
        let a = RandomOverSampler::new(0.4).with_seed(123).resample(&x, &y).unwrap();
        let b = RandomOverSampler::new(0.4).with_seed(123).resample(&x, &y).unwrap();
        assert_eq!(a.x, b.x);
    }

    #[test]
    fn test_invalid_proportion() {
        let (x, y) = create_imbalanced_data();
        for tp in [1.0, 1.5, -0.2, f64::NAN, f64::INFINITY] {
            let err = RandomOverSampler::new(tp).resample(&x, &y).unwrap_err();
            assert!(matches!(err, PrepError::InvalidProportion(_)));
        }
    }

    #[test]
    fn test_empty_positive_class() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = Array1::from_vec(vec![0, 0, 0]);

        let err = RandomOverSampler::new(0.5).resample(&x, &y).unwrap_err();
        assert!(matches!(err, PrepError::EmptyClass { class: 1, requested: 3 }));

        // zero rows requested is not an error
        let result = RandomOverSampler::new(0.1).resample(&x, &y).unwrap();
        assert_eq!(result.x.nrows(), 3);
    }

    #[test]
    fn test_from_config() {
        let config = CleaningConfig::new().with_target_proportion(0.4).with_seed(5);
        let sampler = RandomOverSampler::from_config(&config);
        assert_eq!(sampler.target_proportion(), 0.4);
        assert_eq!(sampler.name(), "random_over_sampler");

        let (x, y) = create_imbalanced_data();
        let a = sampler.resample(&x, &y).unwrap();
        let b = RandomOverSampler::new(0.4).with_seed(5).resample(&x, &y).unwrap();
        assert_eq!(a.x, b.x);

        let unseeded = RandomOverSampler::from_config(&CleaningConfig::default());
        assert_eq!(unseeded.target_proportion(), DEFAULT_TARGET_PROPORTION);
    }

    #[test]
    fn test_shape_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = Array1::from_vec(vec![0, 1, 0]);
        let err = RandomOverSampler::default().resample(&x, &y).unwrap_err();
        assert!(matches!(err, PrepError::ShapeError { .. }));
    }

    #[test]
    fn test_inputs_not_mutated() {
        let (x, y) = create_imbalanced_data();
        let (x_before, y_before) = (x.clone(), y.clone());
        let _ = RandomOverSampler::new(0.5).resample(&x, &y).unwrap();
        assert_eq!(x, x_before);
        assert_eq!(y, y_before);
    }
}
