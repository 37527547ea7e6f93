use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use eframe::egui;

use crate::data::loader;
use crate::data::model::Dataset;
use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SheetViewerApp {
    pub state: AppState,
    /// Receives the result of the load running on the worker thread.
    pending: Option<Receiver<Result<Dataset>>>,
}

impl SheetViewerApp {
    /// Create the app and start loading `source` in the background.
    pub fn new(source: String, timeout: Duration) -> Self {
        let mut app = Self {
            state: AppState::default(),
            pending: None,
        };
        app.start_load(source, timeout);
        app
    }

    /// Begin a load. Any load still in flight is abandoned: its result is
    /// dropped together with the old receiver.
    fn start_load(&mut self, source: String, timeout: Duration) {
        self.state.begin_load(&source);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = loader::load_source(&source, timeout);
            // The receiver is gone if the load was abandoned.
            let _ = tx.send(result);
        });
        self.pending = Some(rx);
    }

    fn poll_load(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.state.finish_load(result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.state
                    .finish_load(Err(anyhow!("loader thread exited without a result")));
            }
        }
    }
}

impl eframe::App for SheetViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();
        if self.pending.is_some() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        // ---- Top panel: source and row counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: column selection and filter ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: sheet content ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::sheet_content(ui, &self.state);
        });

        panels::alert_window(ctx, &mut self.state);
    }
}
