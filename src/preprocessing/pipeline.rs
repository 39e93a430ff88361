//! Ordered transform pipeline and the `clean` composition

use crate::error::{PrepError, Result};
use crate::synthetic::{RandomOverSampler, Sampler};
use super::{
    cap_outliers, derive_label_before_date, derive_label_from_membership, drop_leakage_columns,
    drop_missing_rows, drop_reference_dummies, encode_categorical, extract_label, log_transform,
    mark_missing_as_category, missing_mask, numeric_values, select_feature_subset, standard_scale,
    CleaningConfig, OUTLIER_STD_THRESHOLD,
};
use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

fn default_n_std() -> f64 {
    OUTLIER_STD_THRESHOLD
}

/// A single table operation with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PipelineStep {
    EncodeCategorical {
        columns: Vec<String>,
    },
    DropLeakageColumns {
        columns: Vec<String>,
    },
    SelectFeatureSubset {
        columns: Vec<String>,
        #[serde(default)]
        label: Option<String>,
    },
    CapOutliers {
        column: String,
        #[serde(default = "default_n_std")]
        n_std: f64,
    },
    DropMissingRows,
    MarkMissingAsCategory {
        columns: Vec<String>,
    },
    LogTransform {
        column: String,
        output: String,
    },
    DropReferenceDummies {
        columns: Vec<String>,
    },
    StandardScale {
        columns: Vec<String>,
    },
    DeriveLabelFromMembership {
        source: String,
        positives: Vec<String>,
        label: String,
    },
    DeriveLabelBeforeDate {
        source: String,
        cutoff: NaiveDate,
        label: String,
    },
}

impl PipelineStep {
    /// Apply this step to a table, producing a new table
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        match self {
            PipelineStep::EncodeCategorical { columns } => encode_categorical(df, columns),
            PipelineStep::DropLeakageColumns { columns } => drop_leakage_columns(df, columns),
            PipelineStep::SelectFeatureSubset { columns, label } => {
                select_feature_subset(df, columns, label.as_deref())
            }
            PipelineStep::CapOutliers { column, n_std } => cap_outliers(df, column, *n_std),
            PipelineStep::DropMissingRows => drop_missing_rows(df),
            PipelineStep::MarkMissingAsCategory { columns } => mark_missing_as_category(df, columns),
            PipelineStep::LogTransform { column, output } => log_transform(df, column, output),
            PipelineStep::DropReferenceDummies { columns } => drop_reference_dummies(df, columns),
            PipelineStep::StandardScale { columns } => standard_scale(df, columns),
            PipelineStep::DeriveLabelFromMembership { source, positives, label } => {
                derive_label_from_membership(df, source, positives, label)
            }
            PipelineStep::DeriveLabelBeforeDate { source, cutoff, label } => {
                derive_label_before_date(df, source, *cutoff, label)
            }
        }
    }

    /// Short operation name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStep::EncodeCategorical { .. } => "encode_categorical",
            PipelineStep::DropLeakageColumns { .. } => "drop_leakage_columns",
            PipelineStep::SelectFeatureSubset { .. } => "select_feature_subset",
            PipelineStep::CapOutliers { .. } => "cap_outliers",
            PipelineStep::DropMissingRows => "drop_missing_rows",
            PipelineStep::MarkMissingAsCategory { .. } => "mark_missing_as_category",
            PipelineStep::LogTransform { .. } => "log_transform",
            PipelineStep::DropReferenceDummies { .. } => "drop_reference_dummies",
            PipelineStep::StandardScale { .. } => "standard_scale",
            PipelineStep::DeriveLabelFromMembership { .. } => "derive_label_from_membership",
            PipelineStep::DeriveLabelBeforeDate { .. } => "derive_label_before_date",
        }
    }
}

/// Ordered list of steps; order is significant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformPipeline {
    steps: Vec<PipelineStep>,
}

impl TransformPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to append a step
    pub fn with_step(mut self, step: PipelineStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Append a step
    pub fn push(&mut self, step: PipelineStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, stopping at the first failure
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut current = df.clone();
        for (i, step) in self.steps.iter().enumerate() {
            current = step.apply(&current)?;
            debug!(
                step = i,
                op = step.name(),
                rows = current.height(),
                cols = current.width(),
                "Applied pipeline step"
            );
        }
        Ok(current)
    }
}

impl From<Vec<PipelineStep>> for TransformPipeline {
    fn from(steps: Vec<PipelineStep>) -> Self {
        Self { steps }
    }
}

/// Convert a fully numeric table into a row-major `f64` matrix.
///
/// Columns keep table order. A missing value or a non-numeric column is an
/// error.
pub fn to_matrix(df: &DataFrame) -> Result<Array2<f64>> {
    let (n_rows, n_cols) = df.shape();
    let mut matrix = Array2::zeros((n_rows, n_cols));

    for (j, column) in df.get_columns().iter().enumerate() {
        let series = column.as_materialized_series();
        if let Some(row) = missing_mask(series).iter().position(|&m| m) {
            return Err(PrepError::DataError(format!(
                "missing value in column {} at row {}",
                series.name(),
                row
            )));
        }

        for (i, v) in numeric_values(series)?.into_iter().enumerate() {
            matrix[[i, j]] = v.unwrap_or(0.0);
        }
    }

    Ok(matrix)
}

/// Fixed cleaning composition producing the feature matrix and labels.
///
/// Runs `pre_steps`, drops leakage columns, encodes categorical columns,
/// selects the feature subset, drops rows with missing values and extracts
/// the label. With `regression` set, reference dummies are dropped and the
/// scale columns standardized before the matrix is built.
pub fn clean(df: &DataFrame, config: &CleaningConfig) -> Result<(Array2<f64>, Array1<i64>)> {
    let start = Instant::now();
    config.validate()?;

    let mut table = config.pre_steps.apply(df)?;

    if !config.leakage_columns.is_empty() {
        table = drop_leakage_columns(&table, &config.leakage_columns)?;
    }
    if !config.categorical_columns.is_empty() {
        table = encode_categorical(&table, &config.categorical_columns)?;
    }

    table = select_feature_subset(&table, &config.feature_subset, Some(config.label_column.as_str()))?;
    table = drop_missing_rows(&table)?;

    let (mut features, y) = extract_label(&table, &config.label_column)?;

    if config.regression {
        features = drop_reference_dummies(&features, &config.reference_dummies)?;
        features = standard_scale(&features, &config.scale_columns)?;
    }

    let x = to_matrix(&features)?;

    info!(
        input_rows = df.height(),
        rows = x.nrows(),
        features = x.ncols(),
        positives = y.iter().filter(|&&v| v == 1).count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Cleaned table"
    );

    Ok((x, y))
}

/// `clean` followed by oversampling towards `config.target_proportion`
pub fn clean_and_balance(
    df: &DataFrame,
    config: &CleaningConfig,
) -> Result<(Array2<f64>, Array1<i64>)> {
    let (x, y) = clean(df, config)?;

    let result = RandomOverSampler::from_config(config).resample(&x, &y)?;
    Ok((result.x, result.y))
}
