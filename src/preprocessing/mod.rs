//! Table transform pipeline
//!
//! Column-level operations that turn a raw record table into a numeric
//! feature matrix and a binary label vector:
//! - Column selection and leakage removal
//! - Categorical one-hot encoding
//! - Outlier row removal (z-score bounds)
//! - Missing value handling
//! - Log and z-score transforms
//! - Label derivation and extraction
//!
//! Every operation takes the current table by reference and returns a new
//! table; nothing is mutated in place and no state survives between calls.

mod config;
mod encoder;
mod missing;
mod scaler;
pub mod columns;
pub mod label;
pub mod outlier;
pub mod pipeline;
pub mod transforms;

pub use columns::{column_names, drop_leakage_columns, select_feature_subset};
pub use config::{CleaningConfig, DEFAULT_LABEL_COLUMN, DEFAULT_TARGET_PROPORTION};
pub use encoder::{drop_reference_dummies, encode_categorical};
pub use label::{derive_label_before_date, derive_label_from_membership, extract_label};
pub use missing::{drop_missing_rows, mark_missing_as_category, MISSING_CATEGORY};
pub use outlier::{cap_outliers, outlier_bounds, OutlierBounds, OUTLIER_STD_THRESHOLD};
pub use pipeline::{clean, clean_and_balance, to_matrix, PipelineStep, TransformPipeline};
pub use scaler::standard_scale;
pub use transforms::log_transform;

use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Per-column summary used for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub count: usize,
    pub null_count: usize,
}

/// Summarize every column of the table in column order
pub fn summarize(df: &DataFrame) -> Vec<ColumnSummary> {
    df.get_columns()
        .iter()
        .map(|column| {
            let series = column.as_materialized_series();
            ColumnSummary {
                name: series.name().to_string(),
                dtype: series.dtype().to_string(),
                count: series.len(),
                null_count: missing_mask(series).iter().filter(|&&m| m).count(),
            }
        })
        .collect()
}

/// Look up a column, mapping absence to `MissingColumn`
pub(crate) fn get_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|column| column.as_materialized_series())
        .map_err(|_| PrepError::MissingColumn(name.to_string()))
}

/// Fail on the first name that is not a column of `df`
pub(crate) fn require_columns<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> Result<()> {
    for name in names {
        get_series(df, name.as_ref())?;
    }
    Ok(())
}

/// Names in first-seen order with repeats removed
pub(crate) fn unique_names<S: AsRef<str>>(names: &[S]) -> Vec<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Whether a dtype can be read as `f64`
pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean)
}

/// Read a numeric column as `f64`; nulls and NaN come back as `None`
pub(crate) fn numeric_values(series: &Series) -> Result<Vec<Option<f64>>> {
    if !is_numeric_dtype(series.dtype()) {
        return Err(PrepError::NonNumericColumn {
            column: series.name().to_string(),
            dtype: series.dtype().to_string(),
        });
    }

    let casted = series.cast(&DataType::Float64)?;
    let values = casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();

    Ok(values)
}

/// Row-wise missingness of a column (null, or NaN in a float column)
pub(crate) fn missing_mask(series: &Series) -> Vec<bool> {
    let mut mask: Vec<bool> = series
        .is_null()
        .into_iter()
        .map(|v| v.unwrap_or(false))
        .collect();

    if series.dtype().is_float() {
        if let Ok(casted) = series.cast(&DataType::Float64) {
            if let Ok(ca) = casted.f64() {
                for (slot, v) in mask.iter_mut().zip(ca.into_iter()) {
                    if v.map_or(false, f64::is_nan) {
                        *slot = true;
                    }
                }
            }
        }
    }

    mask
}

/// Keep the rows whose flag is set
pub(crate) fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask: BooleanChunked = keep.iter().copied().collect();
    Ok(df.filter(&mask)?)
}
