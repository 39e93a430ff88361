//! One-hot encoding of categorical columns

use crate::error::{PrepError, Result};
use super::{get_series, require_columns, unique_names};
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// Replace each listed column with one indicator column per observed category.
///
/// Indicators are named `{column}_{category}`, hold 0/1 as `Int32` and are
/// appended after the remaining columns in lexicographic category order.
/// Non-string columns are stringified first. A missing value yields 0 in
/// every indicator of its column.
///
/// An indicator name that matches an existing column, or another indicator
/// of the same call, is a `DuplicateColumn` error and nothing is encoded.
pub fn encode_categorical<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    require_columns(df, columns)?;
    let columns = unique_names(columns);

    let stringified = columns
        .iter()
        .map(|name| Ok(get_series(df, name)?.cast(&DataType::String)?))
        .collect::<Result<Vec<Series>>>()?;

    // Resolve every indicator name before touching the table
    let mut taken: HashSet<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mut plan = Vec::with_capacity(columns.len());

    for (col_name, series) in columns.iter().zip(&stringified) {
        let ca = series.str()?;
        let categories: BTreeSet<&str> = ca.into_iter().flatten().collect();

        for category in &categories {
            let indicator = format!("{}_{}", col_name, category);
            if !taken.insert(indicator.clone()) {
                return Err(PrepError::DuplicateColumn(indicator));
            }
        }
        plan.push((*col_name, ca, categories));
    }

    let mut result = df.clone();

    for (col_name, ca, categories) in plan {
        // Build all indicators first, then apply them in one pass
        let indicators: Vec<Series> = categories
            .par_iter()
            .map(|category| {
                let values: Vec<i32> = ca
                    .into_iter()
                    .map(|v| if v == Some(*category) { 1 } else { 0 })
                    .collect();
                Series::new(format!("{}_{}", col_name, category).into(), values)
            })
            .collect();

        result = result.drop(col_name)?;
        for indicator in indicators {
            result.with_column(indicator)?;
        }
    }

    Ok(result)
}

/// Drop one reference indicator per categorical group.
///
/// Used before fitting a regression model so the indicators of a group do
/// not sum to a constant. A name listed twice is dropped once.
pub fn drop_reference_dummies<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> Result<DataFrame> {
    require_columns(df, names)?;

    let mut result = df.clone();
    for name in unique_names(names) {
        result = result.drop(name)?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::column_names;

    fn create_test_df() -> DataFrame {
        df!(
            "city" => &[Some("Winterfell"), Some("Astapor"), Some("Winterfell"), None],
            "phone" => &[Some("iPhone"), Some("Android"), Some("iPhone"), Some("iPhone")],
            "trips" => &[4i64, 0, 1, 2],
        )
        .unwrap()
    }

    #[test]
    fn test_one_indicator_per_category() {
        let df = create_test_df();
        let result = encode_categorical(&df, &["city", "phone"]).unwrap();

        assert_eq!(result.height(), df.height());
        assert_eq!(
            column_names(&result),
            vec!["trips", "city_Astapor", "city_Winterfell", "phone_Android", "phone_iPhone"]
        );

        let winterfell: Vec<Option<i32>> = result
            .column("city_Winterfell")
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(winterfell, vec![Some(1), Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn test_missing_value_has_no_indicator() {
        let df = create_test_df();
        let result = encode_categorical(&df, &["city"]).unwrap();

        let astapor = result.column("city_Astapor").unwrap().i32().unwrap();
        let winterfell = result.column("city_Winterfell").unwrap().i32().unwrap();
        assert_eq!(astapor.get(3), Some(0));
        assert_eq!(winterfell.get(3), Some(0));
    }

    #[test]
    fn test_numeric_categories_are_stringified() {
        let df = df!("luxury_car_user" => &[true, false, true]).unwrap();
        let result = encode_categorical(&df, &["luxury_car_user"]).unwrap();
        assert_eq!(
            column_names(&result),
            vec!["luxury_car_user_false", "luxury_car_user_true"]
        );
    }

    #[test]
    fn test_encode_missing_column() {
        let df = create_test_df();
        let err = encode_categorical(&df, &["city", "country"]).unwrap_err();
        assert!(matches!(err, PrepError::MissingColumn(name) if name == "country"));
    }

    #[test]
    fn test_drop_reference_dummies() {
        let df = create_test_df();
        let encoded = encode_categorical(&df, &["city", "phone"]).unwrap();
        let result = drop_reference_dummies(&encoded, &["phone_iPhone", "city_Astapor"]).unwrap();
        assert_eq!(column_names(&result), vec!["trips", "city_Winterfell", "phone_Android"]);

        let err = drop_reference_dummies(&encoded, &["phone_Blackberry"]).unwrap_err();
        assert!(matches!(err, PrepError::MissingColumn(_)));
    }

    #[test]
    fn test_indicator_clash_with_existing_column() {
        let df = df!("city" => &["A", "B"], "city_A" => &[7i64, 7]).unwrap();
        let err = encode_categorical(&df, &["city"]).unwrap_err();
        assert!(matches!(err, PrepError::DuplicateColumn(name) if name == "city_A"));

        // the existing column is left alone
        let kept: Vec<Option<i64>> = df.column("city_A").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(kept, vec![Some(7), Some(7)]);
    }

    #[test]
    fn test_indicator_clash_between_encoded_columns() {
        // "a" + "b_c" and "a_b" + "c" both produce "a_b_c"
        let df = df!("a" => &["b_c"], "a_b" => &["c"]).unwrap();
        let err = encode_categorical(&df, &["a", "a_b"]).unwrap_err();
        assert!(matches!(err, PrepError::DuplicateColumn(_)));
    }

    #[test]
    fn test_repeated_names_encode_once() {
        let df = create_test_df();
        let once = encode_categorical(&df, &["phone"]).unwrap();
        let twice = encode_categorical(&df, &["phone", "phone"]).unwrap();
        assert_eq!(column_names(&once), column_names(&twice));
    }

    #[test]
    fn test_drop_reference_dummies_repeated_name() {
        let df = create_test_df();
        let encoded = encode_categorical(&df, &["phone"]).unwrap();
        let result = drop_reference_dummies(&encoded, &["phone_iPhone", "phone_iPhone"]).unwrap();
        assert_eq!(column_names(&result), vec!["city", "trips", "phone_Android"]);
    }
}
