//! Outlier row removal
//!
//! Rows whose value lies more than a fixed number of standard deviations
//! from the column mean are removed. Bounds are recomputed from the
//! column's current values on every call.

use crate::error::Result;
use super::{filter_rows, get_series, numeric_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of standard deviations kept on each side of the mean
pub const OUTLIER_STD_THRESHOLD: f64 = 3.0;

/// Bounds computed for one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub lower: f64,
    pub upper: f64,
    pub mean: f64,
    pub std: f64,
}

impl OutlierBounds {
    /// Mean ± `n_std` sample standard deviations of the non-missing values.
    ///
    /// With no values the bounds are unbounded; with one value the
    /// deviation is taken as zero.
    pub fn from_values(values: &[f64], n_std: f64) -> Self {
        if values.is_empty() {
            return Self {
                lower: f64::NEG_INFINITY,
                upper: f64::INFINITY,
                mean: 0.0,
                std: 0.0,
            };
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = if values.len() < 2 {
            0.0
        } else {
            (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        };

        Self {
            lower: mean - n_std * std,
            upper: mean + n_std * std,
            mean,
            std,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Compute the current bounds of a numeric column
pub fn outlier_bounds(df: &DataFrame, column: &str, n_std: f64) -> Result<OutlierBounds> {
    let values: Vec<f64> = numeric_values(get_series(df, column)?)?
        .into_iter()
        .flatten()
        .collect();
    Ok(OutlierBounds::from_values(&values, n_std))
}

/// Remove rows whose `column` value falls outside mean ± `n_std` σ.
///
/// Rows with a missing value in `column` are removed as well.
pub fn cap_outliers(df: &DataFrame, column: &str, n_std: f64) -> Result<DataFrame> {
    let values = numeric_values(get_series(df, column)?)?;
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let bounds = OutlierBounds::from_values(&present, n_std);

    let keep: Vec<bool> = values
        .iter()
        .map(|v| v.map_or(false, |x| bounds.contains(x)))
        .collect();

    let result = filter_rows(df, &keep)?;
    debug!(
        column,
        lower = bounds.lower,
        upper = bounds.upper,
        removed = df.height() - result.height(),
        "Capped outliers"
    );

    Ok(result)
}
