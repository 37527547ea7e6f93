use serde::Serialize;

use super::model::Dataset;
use crate::error::ViewerError;

/// Ordered column names of the dataset, taken from its first row.
pub fn column_names(dataset: &Dataset) -> Result<Vec<String>, ViewerError> {
    if dataset.is_empty() {
        return Err(ViewerError::EmptyDataset);
    }
    Ok(dataset.column_names().to_vec())
}

/// One entry of the `operation-columns` checkbox group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnChoice {
    pub name: String,
    pub checked: bool,
}

// ---------------------------------------------------------------------------
// Column registry: the two selection surfaces fed from the column list
// ---------------------------------------------------------------------------

/// Options of the `primary-column` dropdown and the `operation-columns`
/// checkbox group. Both are rebuilt from scratch on every populate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ColumnRegistry {
    pub primary_options: Vec<String>,
    pub primary: Option<String>,
    pub operation_columns: Vec<ColumnChoice>,
}

impl ColumnRegistry {
    /// Rebuild both surfaces from `dataset`. Stale entries are cleared even
    /// when the dataset is empty and the error is returned.
    pub fn populate(&mut self, dataset: &Dataset) -> Result<(), ViewerError> {
        *self = ColumnRegistry::default();

        let names = column_names(dataset)?;
        self.primary = names.first().cloned();
        self.operation_columns = names
            .iter()
            .map(|name| ColumnChoice {
                name: name.clone(),
                checked: false,
            })
            .collect();
        self.primary_options = names;
        Ok(())
    }

    pub fn set_checked(&mut self, column: &str, checked: bool) {
        if let Some(choice) = self.operation_columns.iter_mut().find(|c| c.name == column) {
            choice.checked = checked;
        }
    }

    pub fn set_primary(&mut self, column: &str) {
        if self.primary_options.iter().any(|c| c == column) {
            self.primary = Some(column.to_string());
        }
    }

    /// Checked column names, in column order.
    pub fn selected_columns(&self) -> Vec<String> {
        self.operation_columns
            .iter()
            .filter(|c| c.checked)
            .map(|c| c.name.clone())
            .collect()
    }
}
