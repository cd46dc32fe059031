// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rangefinder - map grid calibration and distance measurement
//!
//! A desktop tool for measuring in-game distances on a square map image.
//! Two markers spanning a known grid length calibrate the scale; two more
//! markers are then measured against it.

mod app;
mod config;
mod io;
mod models;
mod ui;
mod util;

use app::RangefinderApp;
use anyhow::Result;
use config::Settings;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let settings = Settings::load();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window.width, settings.window.height])
            .with_min_inner_size([settings.window.min_width, settings.window.min_height])
            .with_drag_and_drop(true)
            .with_title("Rangefinder"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Rangefinder",
        options,
        Box::new(|_cc| Ok(Box::new(RangefinderApp::new(settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
