//! Z-score scaling

use crate::error::Result;
use super::{get_series, numeric_values, require_columns};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Center and scale of one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ScalerParams {
    center: f64,
    scale: f64,
}

impl ScalerParams {
    /// Mean and population standard deviation; zero variance scales by 1
    fn from_values(values: &[Option<f64>]) -> Self {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.is_empty() {
            return Self { center: 0.0, scale: 1.0 };
        }

        let n = present.len() as f64;
        let mean = present.iter().sum::<f64>() / n;
        let std = (present.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();

        Self {
            center: mean,
            scale: if std == 0.0 { 1.0 } else { std },
        }
    }
}

/// Standardize each listed column to zero mean and unit variance.
///
/// Statistics come from the column itself; missing values stay missing.
pub fn standard_scale<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    require_columns(df, columns)?;

    // Build all scaled columns first, then apply them in one pass
    let replacements: Vec<Series> = columns
        .iter()
        .map(|col_name| {
            let series = get_series(df, col_name.as_ref())?;
            let values = numeric_values(series)?;
            let params = ScalerParams::from_values(&values);

            let scaled: Float64Chunked = values
                .into_iter()
                .map(|opt| opt.map(|v| (v - params.center) / params.scale))
                .collect();

            Ok(scaled.with_name(series.name().clone()).into_series())
        })
        .collect::<Result<Vec<_>>>()?;

    let mut result = df.clone();
    for scaled in replacements {
        result.with_column(scaled)?;
    }

    Ok(result)
}
