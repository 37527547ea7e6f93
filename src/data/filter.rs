use std::fmt;

use serde::Serialize;

use super::model::Dataset;
use crate::error::ViewerError;

// ---------------------------------------------------------------------------
// Filter mode: which nullness every selected column must have
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum FilterMode {
    /// Keep rows where every selected column is NULL.
    #[default]
    #[value(name = "null")]
    #[serde(rename = "null")]
    RequireNull,
    /// Keep rows where no selected column is NULL.
    #[value(name = "not-null")]
    #[serde(rename = "not-null")]
    RequireNonNull,
}

impl FilterMode {
    pub const ALL: [FilterMode; 2] = [FilterMode::RequireNull, FilterMode::RequireNonNull];

    /// Form value of the `operation` control.
    pub fn value(self) -> &'static str {
        match self {
            FilterMode::RequireNull => "null",
            FilterMode::RequireNonNull => "not-null",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::RequireNull => "Show nulls",
            FilterMode::RequireNonNull => "Show non-nulls",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Filter evaluation
// ---------------------------------------------------------------------------

/// Return indices of rows whose nullness matches `mode` on *every* selected column.
///
/// Always evaluated against the full dataset, so successive calls never narrow
/// each other. A column missing from a row counts as non-null.
pub fn filtered_indices(
    dataset: &Dataset,
    columns: &[String],
    mode: FilterMode,
) -> Result<Vec<usize>, ViewerError> {
    if columns.is_empty() {
        return Err(ViewerError::NoColumnsSelected);
    }

    let want_null = mode == FilterMode::RequireNull;

    Ok(dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            columns.iter().all(|col| {
                let is_null = row.get(col).is_some_and(|v| v.is_null());
                is_null == want_null
            })
        })
        .map(|(i, _)| i)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Row};

    fn sample() -> Dataset {
        let rows: Vec<Row> = vec![
            [("A", CellValue::Integer(1)), ("B", CellValue::Null)].into_iter().collect(),
            [("A", CellValue::Null), ("B", CellValue::Integer(2))].into_iter().collect(),
            [("A", CellValue::Integer(3)), ("B", CellValue::Integer(4))].into_iter().collect(),
        ];
        Dataset::from_rows(rows).unwrap()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_column_require_null() {
        let ds = sample();
        let idx = filtered_indices(&ds, &cols(&["A"]), FilterMode::RequireNull).unwrap();
        assert_eq!(idx, vec![1]);
    }

    #[test]
    fn all_columns_require_non_null() {
        let ds = sample();
        let idx = filtered_indices(&ds, &cols(&["A", "B"]), FilterMode::RequireNonNull).unwrap();
        assert_eq!(idx, vec![2]);
    }

    #[test]
    fn conditions_are_conjunctive() {
        let ds = sample();
        // No row is NULL in both A and B.
        let idx = filtered_indices(&ds, &cols(&["A", "B"]), FilterMode::RequireNull).unwrap();
        assert!(idx.is_empty());
    }

    #[test]
    fn require_null_keeps_rows_null_in_every_selected_column() {
        let rows: Vec<Row> = vec![
            [("A", CellValue::Integer(1)), ("B", CellValue::Null)].into_iter().collect(),
            [("A", CellValue::Null), ("B", CellValue::Null)].into_iter().collect(),
            [("A", CellValue::Null), ("B", CellValue::Integer(4))].into_iter().collect(),
        ];
        let ds = Dataset::from_rows(rows).unwrap();
        let idx = filtered_indices(&ds, &cols(&["A", "B"]), FilterMode::RequireNull).unwrap();
        assert_eq!(idx, vec![1]);
    }

    #[test]
    fn no_columns_is_rejected() {
        let ds = sample();
        let err = filtered_indices(&ds, &[], FilterMode::RequireNonNull).unwrap_err();
        assert_eq!(err, ViewerError::NoColumnsSelected);
    }

    #[test]
    fn result_preserves_dataset_order() {
        let ds = sample();
        let idx = filtered_indices(&ds, &cols(&["B"]), FilterMode::RequireNonNull).unwrap();
        assert_eq!(idx, vec![1, 2]);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn repeated_and_successive_filters_do_not_chain() {
        let ds = sample();
        let first = filtered_indices(&ds, &cols(&["A"]), FilterMode::RequireNull).unwrap();
        let again = filtered_indices(&ds, &cols(&["A"]), FilterMode::RequireNull).unwrap();
        assert_eq!(first, again);

        let second = filtered_indices(&ds, &cols(&["B"]), FilterMode::RequireNonNull).unwrap();
        // Row 2 is not in `first`, yet appears: evaluated against the base dataset.
        assert_eq!(second, vec![1, 2]);
    }

    #[test]
    fn unknown_column_counts_as_non_null() {
        let ds = sample();
        let idx = filtered_indices(&ds, &cols(&["Z"]), FilterMode::RequireNonNull).unwrap();
        assert_eq!(idx, vec![0, 1, 2]);
        let idx = filtered_indices(&ds, &cols(&["Z"]), FilterMode::RequireNull).unwrap();
        assert!(idx.is_empty());
    }

    #[test]
    fn mode_values_match_form_values() {
        assert_eq!(FilterMode::RequireNull.value(), "null");
        assert_eq!(FilterMode::RequireNonNull.value(), "not-null");
        assert_eq!(FilterMode::default(), FilterMode::RequireNull);
    }
}
