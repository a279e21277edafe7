// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sheet Labeler
//!
//! A desktop client for finding, reading and fixing the labels on
//! herbarium sheet images with the help of a label-finder and OCR server.

mod app;
mod config;
mod editor;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::SheetLabelerApp;
use config::AppSettings;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let settings = AppSettings::load();
    log::info!("Label server: {}", settings.server_url);

    // An optional sheet to open on startup
    let initial_sheet = std::env::args_os().nth(1).map(std::path::PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Sheet Labeler"),
        ..Default::default()
    };

    eframe::run_native(
        "Sheet Labeler",
        options,
        Box::new(move |_cc| {
            let mut app = SheetLabelerApp::new(settings);
            if let Some(path) = initial_sheet {
                app.open_sheet(path);
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
