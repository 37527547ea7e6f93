use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as produced by the spreadsheet decoder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    /// Absence marker: the cell was empty or missing in the source sheet.
    Null,
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "NULL"),
        }
    }
}

// ---------------------------------------------------------------------------
// Row – one record of the sheet, keys in header order
// ---------------------------------------------------------------------------

/// One record: column name → value, keeping the sheet's column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column` to `value`, replacing an existing entry in place.
    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        let column = column.into();
        match self.cells.iter_mut().find(|(k, _)| *k == column) {
            Some((_, v)) => *v = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, v)| v)
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded sheet
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("row {row} has columns {found:?}, expected {expected:?} (from the first row)")]
    ColumnMismatch {
        row: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// All rows of the first sheet. The first row defines the column set; every
/// other row must carry exactly the same keys in the same order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<Row>,
    column_names: Vec<String>,
}

impl Dataset {
    /// Build a dataset, rejecting rows whose keys diverge from row 0.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self, DatasetError> {
        let column_names: Vec<String> = rows
            .first()
            .map(|r| r.keys().map(str::to_string).collect())
            .unwrap_or_default();

        for (i, row) in rows.iter().enumerate().skip(1) {
            if !row.keys().eq(column_names.iter().map(String::as_str)) {
                return Err(DatasetError::ColumnMismatch {
                    row: i,
                    expected: column_names.clone(),
                    found: row.keys().map(str::to_string).collect(),
                });
            }
        }

        Ok(Dataset { rows, column_names })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Column names of the first row (empty for an empty dataset).
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Resolve a working view (row indices) to the rows it selects.
    pub fn select<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a Row> + 'a {
        indices.iter().filter_map(move |&i| self.rows.get(i))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
