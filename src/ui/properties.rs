// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Calibration details panel.
//!
//! Read-only view of the placed points, pixel lengths, scale factor and the
//! crop applied to the loaded map.

use crate::io::media::{CropRect, TARGET_SIZE};
use crate::models::calibration::CORRECTION_CONSTANT;
use crate::models::segment::{Point, Segment, Slot};
use crate::models::session::Session;

/// Summary of the loaded map for display.
pub struct MapSummary<'a> {
    pub name: &'a str,
    pub source_size: (u32, u32),
    pub crop: CropRect,
}

fn point_text(point: Option<Point>) -> String {
    point.map_or_else(|| "not placed".to_string(), |p| p.to_string())
}

fn segment_grid(ui: &mut egui::Ui, id: &str, segment: &Segment) {
    egui::Grid::new(id).num_columns(2).striped(true).show(ui, |ui| {
        ui.label("A");
        ui.label(point_text(segment.get(Slot::A)));
        ui.end_row();

        ui.label("B");
        ui.label(point_text(segment.get(Slot::B)));
        ui.end_row();

        ui.label("Length");
        match segment.pixel_length() {
            Some(length) => ui.label(format!("{:.1} px", length)),
            None => ui.label("-"),
        };
        ui.end_row();
    });
}

/// Display the calibration panel.
pub fn show(ui: &mut egui::Ui, session: &Session, map: Option<MapSummary<'_>>) {
    let calibration = session.calibration();

    ui.heading("Calibration");
    ui.separator();

    ui.label(egui::RichText::new("Grid reference").strong());
    segment_grid(ui, "reference_grid", calibration.reference());
    ui.horizontal(|ui| {
        ui.label("Known length:");
        match calibration.reference_length() {
            Some(meters) => ui.label(format!("{} m", meters)),
            None => ui.label("-"),
        };
    });
    ui.horizontal(|ui| {
        ui.label("Scale:");
        ui.label(format!("{:.4} m/px", calibration.scale_factor()));
    });

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Measurement").strong());
    segment_grid(ui, "measurement_grid", calibration.measurement());
    ui.horizontal(|ui| {
        ui.label("Distance:");
        ui.label(egui::RichText::new(format!("{} m", calibration.distance_text())).strong());
    });
    ui.label(
        egui::RichText::new(format!("Includes ×{} projection correction", CORRECTION_CONSTANT))
            .weak()
            .italics(),
    );

    ui.add_space(8.0);
    ui.separator();
    ui.label(egui::RichText::new("Map").strong());
    match map {
        Some(map) => {
            ui.label(map.name);
            ui.label(format!("Source: {}×{}", map.source_size.0, map.source_size.1));
            ui.label(format!(
                "Crop: {}×{} at ({}, {})",
                map.crop.side, map.crop.side, map.crop.x, map.crop.y
            ));
            ui.label(format!("Surface: {}×{}", TARGET_SIZE, TARGET_SIZE));
        }
        None => {
            ui.label(egui::RichText::new("No map loaded").weak());
        }
    }
}
