//! Cleaning configuration

use crate::error::{PrepError, Result};
use super::pipeline::{PipelineStep, TransformPipeline};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Label column produced for the fraud dataset
pub const DEFAULT_LABEL_COLUMN: &str = "fraud";

/// Positive-class share the balancer aims for by default
pub const DEFAULT_TARGET_PROPORTION: f64 = 0.3;

/// Everything `clean` needs to know about a schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Steps run on the raw table before the fixed composition
    pub pre_steps: TransformPipeline,

    /// Columns removed because they leak the outcome
    pub leakage_columns: Vec<String>,

    /// Columns one-hot encoded before the subset is taken
    pub categorical_columns: Vec<String>,

    /// Fixed feature columns that make up the matrix, in order
    pub feature_subset: Vec<String>,

    /// Name of the binary label column
    pub label_column: String,

    /// Drop reference dummies and z-score `scale_columns`
    pub regression: bool,

    /// One indicator per categorical group, dropped when `regression` is set
    pub reference_dummies: Vec<String>,

    /// Numeric columns standardized when `regression` is set
    pub scale_columns: Vec<String>,

    /// Target positive-class proportion, within [0, 1)
    pub target_proportion: f64,

    /// Random seed for oversampling
    pub seed: Option<u64>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            pre_steps: TransformPipeline::new(),
            leakage_columns: Vec::new(),
            categorical_columns: Vec::new(),
            feature_subset: ["body_length", "channels", "num_payouts", "org_twitter"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            regression: false,
            reference_dummies: Vec::new(),
            scale_columns: Vec::new(),
            target_proportion: DEFAULT_TARGET_PROPORTION,
            seed: None,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Ride-sharing churn schema: date-derived label, encoded city and
    /// phone, dates dropped as leakage.
    pub fn churn() -> Self {
        let names = |cols: &[&str]| cols.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let scale_columns = names(&[
            "avg_dist",
            "avg_rating_by_driver",
            "avg_surge",
            "surge_pct",
            "trips_in_first_30_days",
            "weekday_pct",
        ]);

        let mut feature_subset = scale_columns.clone();
        feature_subset.extend(names(&[
            "log_trips",
            "city_Astapor",
            "city_King's Landing",
            "city_Winterfell",
            "phone_Android",
            "phone_iPhone",
            "phone_missing",
        ]));

        let cutoff = NaiveDate::from_ymd_opt(2014, 6, 1).unwrap_or_default();

        Self {
            pre_steps: TransformPipeline::new()
                .with_step(PipelineStep::DeriveLabelBeforeDate {
                    source: "last_trip_date".to_string(),
                    cutoff,
                    label: "Churn".to_string(),
                })
                .with_step(PipelineStep::MarkMissingAsCategory {
                    columns: names(&["phone"]),
                })
                .with_step(PipelineStep::LogTransform {
                    column: "trips_in_first_30_days".to_string(),
                    output: "log_trips".to_string(),
                }),
            leakage_columns: names(&["last_trip_date", "signup_date"]),
            categorical_columns: names(&["city", "phone"]),
            feature_subset,
            label_column: "Churn".to_string(),
            regression: false,
            reference_dummies: names(&["phone_iPhone", "city_Astapor"]),
            scale_columns,
            target_proportion: DEFAULT_TARGET_PROPORTION,
            seed: None,
        }
    }

    /// Load a configuration from a JSON file; absent fields take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that can be rejected before any data is touched
    pub fn validate(&self) -> Result<()> {
        if !self.target_proportion.is_finite()
            || !(0.0..1.0).contains(&self.target_proportion)
        {
            return Err(PrepError::InvalidProportion(self.target_proportion));
        }
        if self.label_column.is_empty() {
            return Err(PrepError::ConfigError("label_column must not be empty".to_string()));
        }
        if self.feature_subset.is_empty() {
            return Err(PrepError::ConfigError("feature_subset must not be empty".to_string()));
        }
        Ok(())
    }

    /// Names of the matrix columns `clean` produces, in order
    pub fn output_features(&self) -> Vec<String> {
        self.feature_subset
            .iter()
            .filter(|name| **name != self.label_column)
            .filter(|name| !(self.regression && self.reference_dummies.contains(*name)))
            .cloned()
            .collect()
    }

    /// Builder method to set the fixed feature subset
    pub fn with_feature_subset<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.feature_subset = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the leakage columns
    pub fn with_leakage_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.leakage_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the categorical columns
    pub fn with_categorical_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.categorical_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the label column
    pub fn with_label_column(mut self, label: impl Into<String>) -> Self {
        self.label_column = label.into();
        self
    }

    /// Builder method to enable regression preparation
    pub fn with_regression<S: Into<String>>(
        mut self,
        reference_dummies: impl IntoIterator<Item = S>,
        scale_columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.regression = true;
        self.reference_dummies = reference_dummies.into_iter().map(Into::into).collect();
        self.scale_columns = scale_columns.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the steps run before the fixed composition
    pub fn with_pre_steps(mut self, steps: TransformPipeline) -> Self {
        self.pre_steps = steps;
        self
    }

    /// Builder method to set the target proportion
    pub fn with_target_proportion(mut self, tp: f64) -> Self {
        self.target_proportion = tp;
        self
    }

    /// Builder method to set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
