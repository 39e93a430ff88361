//! Column selection and removal

use crate::error::Result;
use super::{require_columns, unique_names};
use polars::prelude::*;

/// Names of the columns currently in the table, in order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Remove columns that leak post-outcome information.
///
/// All names are checked before anything is dropped; a name listed twice
/// is dropped once.
pub fn drop_leakage_columns<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> Result<DataFrame> {
    require_columns(df, names)?;

    let mut result = df.clone();
    for name in unique_names(names) {
        result = result.drop(name)?;
    }

    Ok(result)
}

/// Restrict the table to a fixed list of feature columns.
///
/// When `label` is given it is kept as the last column unless it already
/// appears in `names`.
pub fn select_feature_subset<S: AsRef<str>>(
    df: &DataFrame,
    names: &[S],
    label: Option<&str>,
) -> Result<DataFrame> {
    let mut selection: Vec<&str> = names.iter().map(|name| name.as_ref()).collect();
    if let Some(label) = label {
        if !selection.contains(&label) {
            selection.push(label);
        }
    }

    require_columns(df, &selection)?;
    Ok(df.select(selection)?)
}
