use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::{AppState, Phase};
use crate::view::html::SHEET_CONTENT_ID;
use crate::view::TableView;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Sheet content (central panel)
// ---------------------------------------------------------------------------

/// Render the current table view in the central panel.
pub fn sheet_content(ui: &mut Ui, state: &AppState) {
    if state.phase == Phase::Loading {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.spinner();
        });
        return;
    }

    let (header, body) = match &state.table {
        TableView::Placeholder { message } => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(message);
            });
            return;
        }
        TableView::Grid { header, body } => (header, body),
    };

    ui.push_id(SHEET_CONTENT_ID, |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            // Column widths are remembered per header, so a new sheet starts fresh.
            TableBuilder::new(ui)
                .id_salt(header)
                .striped(true)
                .resizable(true)
                .columns(Column::auto().at_least(40.0), header.len())
                .header(ROW_HEIGHT + 4.0, |mut row| {
                    for name in header {
                        row.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body_ui| {
                    body_ui.rows(ROW_HEIGHT, body.len(), |mut row| {
                        let cells = &body[row.index()];
                        for cell in cells {
                            row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
    });
}
