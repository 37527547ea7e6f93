use eframe::egui::{self, Align2, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::FilterMode;
use crate::state::{AppState, Phase};
use crate::view::html::{
    APPLY_OPERATION_ID, OPERATION_COLUMNS_ID, OPERATION_ID, PRIMARY_COLUMN_ID,
};

// ---------------------------------------------------------------------------
// Left side panel – column selection and filter controls
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Columns");
    ui.separator();

    // ---- Primary column ----
    ui.strong("Primary column");
    let options = state.registry.primary_options.clone();
    let current = state.registry.primary.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt(PRIMARY_COLUMN_ID)
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &options {
                if ui.selectable_label(current == *col, col).clicked() {
                    state.registry.set_primary(col);
                }
            }
        });
    ui.separator();

    // ---- Operation columns ----
    ui.strong("Filter columns");
    ui.push_id(OPERATION_COLUMNS_ID, |ui: &mut Ui| {
        ScrollArea::vertical()
            .max_height(ui.available_height() * 0.6)
            .auto_shrink([false, true])
            .show(ui, |ui: &mut Ui| {
                if state.registry.operation_columns.is_empty() {
                    ui.label("No columns.");
                }
                for choice in &mut state.registry.operation_columns {
                    ui.checkbox(&mut choice.checked, choice.name.as_str());
                }
            });
    });
    ui.separator();

    // ---- Operation + apply ----
    ui.strong("Operation");
    egui::ComboBox::from_id_salt(OPERATION_ID)
        .selected_text(state.mode.label())
        .show_ui(ui, |ui: &mut Ui| {
            for mode in FilterMode::ALL {
                ui.selectable_value(&mut state.mode, mode, mode.label());
            }
        });

    ui.add_space(6.0);
    // Always clickable: with nothing selected the filter raises its own alert.
    let clicked = ui
        .push_id(APPLY_OPERATION_ID, |ui: &mut Ui| ui.button("Apply").clicked())
        .inner;
    if clicked {
        state.apply_filter();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        let source = if state.source.is_empty() {
            "(no fileUrl)"
        } else {
            state.source.as_str()
        };
        ui.label(RichText::new(source).monospace());
        ui.separator();

        match state.phase {
            Phase::Empty => {
                ui.label("No dataset loaded.");
            }
            Phase::Loading => {
                ui.spinner();
                ui.label("Loading…");
            }
            Phase::Loaded | Phase::Filtered => {
                ui.label(format!(
                    "{} rows loaded, {} visible",
                    state.dataset.len(),
                    state.working_view.len()
                ));
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Alert
// ---------------------------------------------------------------------------

/// Show the pending alert, if any, until the user dismisses it.
pub fn alert_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.alert.clone() else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new("Notice")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(RichText::new(message).color(Color32::LIGHT_RED));
            ui.add_space(4.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        state.dismiss_alert();
    }
}
