//! Numeric column transforms

use crate::error::Result;
use super::{get_series, numeric_values};
use polars::prelude::*;

/// Natural log that maps every undefined input to zero.
///
/// Zero, negative, missing and non-finite results all become `0.0`.
pub fn safe_ln(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v > 0.0 => {
            let ln = v.ln();
            if ln.is_finite() { ln } else { 0.0 }
        }
        _ => 0.0,
    }
}

/// Append `output` holding the natural log of `column`.
///
/// The source column stays in place; an existing `output` column is
/// replaced.
pub fn log_transform(df: &DataFrame, column: &str, output: &str) -> Result<DataFrame> {
    let values = numeric_values(get_series(df, column)?)?;
    let logged: Vec<f64> = values.into_iter().map(safe_ln).collect();

    let mut result = df.clone();
    result.with_column(Series::new(output.into(), logged))?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepError;

    #[test]
    fn test_log_transform() {
        let df = df!(
            "trips_in_first_30_days" => &[Some(0i64), Some(1), Some(4), None],
        )
        .unwrap();

        let result = log_transform(&df, "trips_in_first_30_days", "log_trips").unwrap();
        assert_eq!(result.width(), 2);

        let logged: Vec<f64> = result
            .column("log_trips")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();

        assert_eq!(logged[0], 0.0);
        assert_eq!(logged[1], 0.0);
        assert!((logged[2] - 4f64.ln()).abs() < 1e-12);
        assert_eq!(logged[3], 0.0);
        assert!(logged.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_safe_ln_never_nan() {
        for v in [Some(-2.0), Some(0.0), Some(f64::NAN), Some(f64::INFINITY), None] {
            assert_eq!(safe_ln(v), 0.0);
        }
        assert!((safe_ln(Some(std::f64::consts::E)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_transform_replaces_output() {
        let df = df!("x" => &[1.0, 2.0], "log_x" => &[9.0, 9.0]).unwrap();
        let result = log_transform(&df, "x", "log_x").unwrap();
        assert_eq!(result.width(), 2);
        let log_x = result.column("log_x").unwrap().f64().unwrap();
        assert_eq!(log_x.get(0), Some(0.0));
    }

    #[test]
    fn test_log_transform_missing_column() {
        let df = df!("x" => &[1.0]).unwrap();
        let err = log_transform(&df, "y", "log_y").unwrap_err();
        assert!(matches!(err, PrepError::MissingColumn(_)));
    }
}
