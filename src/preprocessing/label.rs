//! Target label derivation and extraction

use crate::error::{PrepError, Result};
use super::{get_series, numeric_values};
use chrono::NaiveDate;
use ndarray::Array1;
use polars::prelude::*;

/// Date format accepted by [`derive_label_before_date`]
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Append a 0/1 `label` column that is 1 when `source` is one of `positives`.
///
/// Missing source values are labelled 0.
pub fn derive_label_from_membership<S: AsRef<str>>(
    df: &DataFrame,
    source: &str,
    positives: &[S],
    label: &str,
) -> Result<DataFrame> {
    let series = get_series(df, source)?.cast(&DataType::String)?;

    let values: Vec<i64> = series
        .str()?
        .into_iter()
        .map(|v| match v {
            Some(s) if positives.iter().any(|p| p.as_ref() == s) => 1,
            _ => 0,
        })
        .collect();

    let mut result = df.clone();
    result.with_column(Series::new(label.into(), values))?;
    Ok(result)
}

/// Append a 0/1 `label` column that is 1 when the `source` date is strictly
/// before `cutoff`.
///
/// Only the leading `YYYY-MM-DD` part of each value is read, so full
/// timestamps are accepted. A missing date is labelled 0; an unparseable
/// one is a `DataError`.
pub fn derive_label_before_date(
    df: &DataFrame,
    source: &str,
    cutoff: NaiveDate,
    label: &str,
) -> Result<DataFrame> {
    let series = get_series(df, source)?.cast(&DataType::String)?;

    let values: Vec<i64> = series
        .str()?
        .into_iter()
        .map(|v| {
            let Some(raw) = v else {
                return Ok(0);
            };
            let date = NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), DATE_FORMAT)
                .map_err(|e| {
                    PrepError::DataError(format!("invalid date {:?} in {}: {}", raw, source, e))
                })?;
            Ok(i64::from(date < cutoff))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut result = df.clone();
    result.with_column(Series::new(label.into(), values))?;
    Ok(result)
}

/// Detach the label column and return it as a 0/1 vector.
///
/// Boolean labels map to 0/1; numeric labels must be exactly 0 or 1.
pub fn extract_label(df: &DataFrame, label: &str) -> Result<(DataFrame, Array1<i64>)> {
    let series = get_series(df, label)?;

    let values = numeric_values(series).map_err(|_| {
        PrepError::InvalidLabel(format!(
            "label column {} has non-binary dtype {}",
            label,
            series.dtype()
        ))
    })?;

    let y = values
        .into_iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(x) if x == 0.0 => Ok(0),
            Some(x) if x == 1.0 => Ok(1),
            Some(x) => Err(PrepError::InvalidLabel(format!("value {} at row {}", x, row))),
            None => Err(PrepError::InvalidLabel(format!("missing value at row {}", row))),
        })
        .collect::<Result<Vec<i64>>>()?;

    let features = df.drop(label)?;
    Ok((features, Array1::from_vec(y)))
}
