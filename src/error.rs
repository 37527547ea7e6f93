use thiserror::Error;

/// Conditions that are reported to the user as an alert. Neither is fatal:
/// the action is abandoned and the user may retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewerError {
    #[error("No data available to populate columns.")]
    EmptyDataset,

    #[error("Please select at least one column.")]
    NoColumnsSelected,
}
