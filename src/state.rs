use anyhow::Result;

use crate::data::columns::ColumnRegistry;
use crate::data::filter::{filtered_indices, FilterMode};
use crate::data::model::Dataset;
use crate::view::TableView;

// ---------------------------------------------------------------------------
// Load / filter lifecycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing loaded, or the last load failed.
    #[default]
    Empty,
    Loading,
    /// Working view is the whole dataset.
    Loaded,
    /// Working view is the result of the last filter action.
    Filtered,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    pub phase: Phase,

    /// Source the current dataset was (or is being) loaded from.
    pub source: String,

    /// Loaded dataset; empty until a load succeeds.
    pub dataset: Dataset,

    /// Indices of dataset rows currently displayed.
    pub working_view: Vec<usize>,

    /// Options of the column selection controls.
    pub registry: ColumnRegistry,

    /// Selected value of the `operation` control.
    pub mode: FilterMode,

    /// Last rendered table.
    pub table: TableView,

    /// Pending user-visible notice, shown until dismissed.
    pub alert: Option<String>,
}

impl AppState {
    pub fn begin_load(&mut self, source: &str) {
        self.source = source.to_string();
        self.phase = Phase::Loading;
    }

    /// Ingest the outcome of a load. Failures are only logged: the dataset is
    /// left empty and no alert is raised.
    pub fn finish_load(&mut self, result: Result<Dataset>) {
        match result {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?} from {}",
                    dataset.len(),
                    dataset.column_names(),
                    self.source
                );
                self.working_view = (0..dataset.len()).collect();
                self.dataset = dataset;
                self.phase = Phase::Loaded;
                self.populate_columns();
            }
            Err(e) => {
                log::error!("Error loading sheet from '{}': {e:#}", self.source);
                self.dataset = Dataset::default();
                self.working_view.clear();
                self.phase = Phase::Empty;
            }
        }
        self.refresh_view();
    }

    /// Rebuild the column selection controls from the dataset.
    pub fn populate_columns(&mut self) {
        if let Err(e) = self.registry.populate(&self.dataset) {
            self.raise_alert(e.to_string());
        }
    }

    /// Run the filter with the current selection. A rejected filter leaves
    /// the working view and the table untouched.
    pub fn apply_filter(&mut self) {
        let columns = self.registry.selected_columns();
        match filtered_indices(&self.dataset, &columns, self.mode) {
            Ok(indices) => {
                log::debug!(
                    "filter {:?} on {:?}: {} of {} rows",
                    self.mode,
                    columns,
                    indices.len(),
                    self.dataset.len()
                );
                self.working_view = indices;
                self.phase = Phase::Filtered;
                self.refresh_view();
            }
            Err(e) => self.raise_alert(e.to_string()),
        }
    }

    /// Re-render the working view.
    pub fn refresh_view(&mut self) {
        self.table = TableView::from_rows(self.dataset.select(&self.working_view));
    }

    pub fn raise_alert(&mut self, message: String) {
        log::warn!("{message}");
        self.alert = Some(message);
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Row};
    use anyhow::anyhow;

    fn sample() -> Dataset {
        let rows: Vec<Row> = vec![
            [("A", CellValue::Integer(1)), ("B", CellValue::Null)].into_iter().collect(),
            [("A", CellValue::Null), ("B", CellValue::Integer(2))].into_iter().collect(),
            [("A", CellValue::Integer(3)), ("B", CellValue::Integer(4))].into_iter().collect(),
        ];
        Dataset::from_rows(rows).unwrap()
    }

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.begin_load("data.xlsx");
        state.finish_load(Ok(sample()));
        state
    }

    #[test]
    fn successful_load_shows_everything() {
        let state = loaded();
        assert_eq!(state.phase, Phase::Loaded);
        assert_eq!(state.working_view, vec![0, 1, 2]);
        assert_eq!(state.table.row_count(), 3);
        assert_eq!(state.registry.primary_options, vec!["A", "B"]);
        assert!(state.alert.is_none());
    }

    #[test]
    fn failed_load_is_silent_and_empty() {
        let mut state = loaded();
        state.begin_load("");
        state.finish_load(Err(anyhow!("no file URL given")));
        assert_eq!(state.phase, Phase::Empty);
        assert!(state.dataset.is_empty());
        assert!(state.alert.is_none());
        assert_eq!(state.table, TableView::placeholder());

        state.populate_columns();
        assert_eq!(
            state.alert.as_deref(),
            Some("No data available to populate columns.")
        );
    }

    #[test]
    fn apply_before_any_data_raises_selection_alert() {
        let mut state = AppState::default();
        state.begin_load("");
        state.finish_load(Err(anyhow!("no file URL given")));

        state.apply_filter();
        assert_eq!(state.alert.as_deref(), Some("Please select at least one column."));
        assert_eq!(state.phase, Phase::Empty);
        assert_eq!(state.table, TableView::placeholder());
    }

    #[test]
    fn empty_sheet_alerts_on_populate() {
        let mut state = AppState::default();
        state.begin_load("empty.xlsx");
        state.finish_load(Ok(Dataset::default()));
        assert_eq!(state.phase, Phase::Loaded);
        assert!(state.alert.is_some());
        assert_eq!(state.table, TableView::placeholder());
    }

    #[test]
    fn filter_without_columns_changes_nothing() {
        let mut state = loaded();
        let before = state.table.clone();
        state.mode = FilterMode::RequireNonNull;
        state.apply_filter();
        assert_eq!(state.alert.as_deref(), Some("Please select at least one column."));
        assert_eq!(state.phase, Phase::Loaded);
        assert_eq!(state.working_view, vec![0, 1, 2]);
        assert_eq!(state.table, before);
    }

    #[test]
    fn consecutive_filters_start_from_the_dataset() {
        let mut state = loaded();
        state.registry.set_checked("A", true);
        state.apply_filter();
        assert_eq!(state.phase, Phase::Filtered);
        assert_eq!(state.working_view, vec![1]);

        state.registry.set_checked("A", false);
        state.registry.set_checked("B", true);
        state.mode = FilterMode::RequireNonNull;
        state.apply_filter();
        assert_eq!(state.working_view, vec![1, 2]);
        assert_eq!(state.table.row_count(), 2);
    }

    #[test]
    fn filter_to_nothing_renders_placeholder() {
        let mut state = loaded();
        state.registry.set_checked("A", true);
        state.registry.set_checked("B", true);
        state.apply_filter();
        assert!(state.working_view.is_empty());
        assert_eq!(state.table, TableView::placeholder());
    }
}
