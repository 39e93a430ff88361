//! Missing value handling

use crate::error::Result;
use super::{filter_rows, get_series, missing_mask, require_columns};
use polars::prelude::*;

/// Sentinel category written into missing categorical cells
pub const MISSING_CATEGORY: &str = "missing";

/// Remove every row holding a missing value in any column
pub fn drop_missing_rows(df: &DataFrame) -> Result<DataFrame> {
    let mut keep = vec![true; df.height()];

    for column in df.get_columns() {
        let mask = missing_mask(column.as_materialized_series());
        for (slot, missing) in keep.iter_mut().zip(mask) {
            if missing {
                *slot = false;
            }
        }
    }

    filter_rows(df, &keep)
}

/// Replace missing values in the listed columns with [`MISSING_CATEGORY`].
///
/// The columns become string columns, so rows missing only there survive
/// [`drop_missing_rows`].
pub fn mark_missing_as_category<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    require_columns(df, columns)?;

    let mut result = df.clone();

    for col_name in columns {
        let series = get_series(df, col_name.as_ref())?;
        let mask = missing_mask(series);
        let as_str = series.cast(&DataType::String)?;

        let filled: Vec<String> = as_str
            .str()?
            .into_iter()
            .zip(mask)
            .map(|(v, missing)| match v {
                Some(s) if !missing => s.to_string(),
                _ => MISSING_CATEGORY.to_string(),
            })
            .collect();

        result.with_column(Series::new(series.name().clone(), filled))?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepError;

    fn create_test_df() -> DataFrame {
        df!(
            "phone" => &[Some("iPhone"), None, Some("Android"), None],
            "avg_rating_by_driver" => &[Some(5.0), Some(4.5), None, Some(f64::NAN)],
            "trips" => &[1i64, 2, 3, 4],
        )
        .unwrap()
    }

    #[test]
    fn test_drop_missing_rows() {
        let df = create_test_df();
        let result = drop_missing_rows(&df).unwrap();

        // rows 1 (phone), 2 (rating null) and 3 (phone + NaN) go
        assert_eq!(result.height(), 1);
        let summary = crate::preprocessing::summarize(&result);
        assert!(summary.iter().all(|c| c.null_count == 0));
    }

    #[test]
    fn test_mark_missing_prevents_drop() {
        let df = create_test_df();
        let marked = mark_missing_as_category(&df, &["phone"]).unwrap();

        let phone: Vec<Option<&str>> = marked.column("phone").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(phone, vec![Some("iPhone"), Some("missing"), Some("Android"), Some("missing")]);

        let result = drop_missing_rows(&marked).unwrap();
        // only the rating gaps remove rows now
        assert_eq!(result.height(), 2);
    }

    #[test]
    fn test_mark_missing_numeric_column() {
        let df = create_test_df();
        let marked = mark_missing_as_category(&df, &["avg_rating_by_driver"]).unwrap();
        let values: Vec<Option<&str>> = marked
            .column("avg_rating_by_driver")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values[2], Some("missing"));
        assert_eq!(values[3], Some("missing"));
    }

    #[test]
    fn test_mark_missing_unknown_column() {
        let df = create_test_df();
        let err = mark_missing_as_category(&df, &["city"]).unwrap_err();
        assert!(matches!(err, PrepError::MissingColumn(_)));
    }
}
