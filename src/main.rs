mod app;
mod config;
mod data;
mod error;
mod state;
mod ui;
mod view;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use app::SheetViewerApp;
use config::{LaunchConfig, OutputFormat};
use data::loader;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = LaunchConfig::parse();
    if config.headless {
        return run_headless(&config);
    }

    let source = config.source();
    let timeout = config.timeout();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sheet Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(SheetViewerApp::new(source, timeout)))),
    )
    .map_err(|e| anyhow!("running viewer window: {e}"))
}

/// Load, optionally apply one filter, and print the resulting view.
fn run_headless(config: &LaunchConfig) -> Result<()> {
    let source = config.source();
    let mut state = AppState::default();

    state.begin_load(&source);
    state.finish_load(loader::load_source(&source, config.timeout()));

    if config.wants_filter() {
        for col in config.columns.iter().flatten() {
            state.registry.set_checked(col, true);
        }
        if let Some(mode) = config.mode {
            state.mode = mode;
        }
        state.apply_filter();
    }

    log::info!("rendering {} rows", state.table.row_count());
    if let Some(alert) = state.alert.take() {
        eprintln!("{alert}");
    }

    let output = match config.format {
        OutputFormat::Html => view::html::render_page(&state.registry, state.mode, &state.table),
        OutputFormat::Text => view::text::render(&state.table),
        OutputFormat::Json => {
            let snapshot = serde_json::json!({
                "source": source,
                "mode": state.mode,
                "columns": state.registry,
                "table": state.table,
            });
            serde_json::to_string_pretty(&snapshot).context("serializing view")? + "\n"
        }
    };
    print!("{output}");
    Ok(())
}
