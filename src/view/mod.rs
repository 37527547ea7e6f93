//! Declarative views: pure projections of rows into something a surface can
//! draw. The egui panels, the HTML page and the terminal grid all consume
//! these instead of touching the dataset directly.

pub mod html;
pub mod text;

use serde::Serialize;

use crate::data::model::Row;

/// Text shown in place of a grid when there is nothing to display.
pub const NO_DATA: &str = "No data available";

/// Grid (header + body) or the empty-data placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableView {
    Grid {
        header: Vec<String>,
        body: Vec<Vec<String>>,
    },
    Placeholder {
        message: String,
    },
}

impl Default for TableView {
    fn default() -> Self {
        TableView::placeholder()
    }
}

impl TableView {
    pub fn placeholder() -> Self {
        TableView::Placeholder {
            message: NO_DATA.to_string(),
        }
    }

    /// Project rows into a grid. The header is taken from the first row's keys;
    /// each body row lists that row's own values in its key order.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Row>,
    {
        let mut rows = rows.into_iter().peekable();
        let Some(first) = rows.peek() else {
            return TableView::placeholder();
        };

        let header = first.keys().map(str::to_string).collect();
        let body = rows
            .map(|row| row.values().map(|v| v.to_string()).collect())
            .collect();

        TableView::Grid { header, body }
    }

    /// Number of body rows (0 for the placeholder).
    pub fn row_count(&self) -> usize {
        match self {
            TableView::Grid { body, .. } => body.len(),
            TableView::Placeholder { .. } => 0,
        }
    }
}
