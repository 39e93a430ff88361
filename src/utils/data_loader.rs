//! Data loading utilities
//!
//! Reading and writing tables, plus the train/test split that happens
//! before cleaning.

use crate::error::{PrepError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use rand::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Fraction of rows kept for training by default
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

/// Seed of the default train/test split
pub const DEFAULT_SPLIT_SEED: u64 = 123;

/// Data loader for record-oriented files
pub struct DataLoader {
    /// Rows read to infer CSV column types
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: 100,
        }
    }

    /// Set the number of rows used for CSV schema inference
    pub fn with_infer_schema_length(mut self, n: usize) -> Self {
        self.infer_schema_length = n.max(1);
        self
    }

    /// Load a JSON file holding an array of records
    pub fn load_json(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let file = File::open(path)?;

        Ok(JsonReader::new(file)
            .with_json_format(JsonFormat::Json)
            .finish()?)
    }

    /// Load a file holding one JSON record per line
    pub fn load_json_lines(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let file = File::open(path)?;

        Ok(JsonReader::new(file)
            .with_json_format(JsonFormat::JsonLines)
            .finish()?)
    }

    /// Load a CSV file with a header row
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let file = File::open(path)?;

        Ok(CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .into_reader_with_file_handle(file)
            .finish()?)
    }

    /// Detect file format from extension and load
    pub fn load_auto(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let df = match ext.as_str() {
            "json" => self.load_json(path)?,
            "jsonl" | "ndjson" => self.load_json_lines(path)?,
            "csv" => self.load_csv(path)?,
            other => {
                return Err(PrepError::ConfigError(format!(
                    "unsupported file format: {:?}",
                    other
                )))
            }
        };

        debug!(path = %path.display(), rows = df.height(), cols = df.width(), "Loaded table");
        Ok(df)
    }
}

/// Save tables to disk
pub struct DataSaver;

impl DataSaver {
    /// Save to CSV
    pub fn save_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).finish(df)?;
        Ok(())
    }
}

/// Rebuild a table from a feature matrix and label vector.
///
/// `feature_names` must match the matrix width; the label becomes the last
/// column.
pub fn matrix_to_frame<S: AsRef<str>>(
    x: &Array2<f64>,
    y: &Array1<i64>,
    feature_names: &[S],
    label: &str,
) -> Result<DataFrame> {
    if feature_names.len() != x.ncols() || y.len() != x.nrows() {
        return Err(PrepError::ShapeError {
            expected: format!("{} columns and {} labels", feature_names.len(), x.nrows()),
            actual: format!("{} columns and {} labels", x.ncols(), y.len()),
        });
    }

    let mut columns: Vec<Column> = feature_names
        .iter()
        .enumerate()
        .map(|(j, name)| Column::new(name.as_ref().into(), x.column(j).to_vec()))
        .collect();
    columns.push(Column::new(label.into(), y.to_vec()));

    Ok(DataFrame::new(columns)?)
}

/// Randomly split rows into train and test tables.
///
/// `floor(train_fraction * n)` rows go to the training table. Both tables
/// keep the input row order.
pub fn train_test_split(
    df: &DataFrame,
    train_fraction: f64,
    seed: u64,
) -> Result<(DataFrame, DataFrame)> {
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(PrepError::ConfigError(format!(
            "train fraction must be within (0, 1), got {}",
            train_fraction
        )));
    }

    let n = df.height();
    let n_train = (train_fraction * n as f64).floor() as usize;

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let mut in_train = vec![false; n];
    for &idx in &order[..n_train] {
        in_train[idx] = true;
    }
    let in_test: Vec<bool> = in_train.iter().map(|&t| !t).collect();

    let train_mask: BooleanChunked = in_train.into_iter().collect();
    let test_mask: BooleanChunked = in_test.into_iter().collect();

    Ok((df.filter(&train_mask)?, df.filter(&test_mask)?))
}
