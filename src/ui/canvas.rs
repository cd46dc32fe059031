// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Map canvas.
//!
//! Draws the fitted map surface, the calibration overlay and the
//! measurement markers, and reports clicks in surface coordinates.

use crate::config::Settings;
use crate::io::media::TARGET_SIZE;
use crate::models::segment::Point;
use crate::models::session::{InteractionMode, Session};
use crate::util::geometry::{end_caps, screen_to_surface, surface_to_screen};

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    /// A click, in surface pixel coordinates.
    Click(Point),
}

fn color(rgba: [u8; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Display the canvas area and handle mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    session: &Session,
    settings: &Settings,
    texture: Option<&egui::TextureHandle>,
    map_name: Option<&str>,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = (ui.available_size() - egui::vec2(0.0, 24.0)).max(egui::vec2(1.0, 1.0));

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);
        let area = egui::Rect::from_min_size(ui.min_rect().min, available_size);

        // Never upscale past the native surface size.
        let side = area.width().min(area.height()).min(TARGET_SIZE as f32).max(1.0);
        let surface_rect = egui::Rect::from_center_size(area.center(), egui::vec2(side, side));
        let rect_min = (surface_rect.min.x, surface_rect.min.y);

        let response = ui.allocate_rect(area, egui::Sense::click());
        if session.mode() != InteractionMode::None && response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                // Without a map the session refuses the placement itself.
                if surface_rect.contains(pos) || texture.is_none() {
                    action = CanvasAction::Click(screen_to_surface(
                        (pos.x, pos.y),
                        rect_min,
                        side,
                        TARGET_SIZE,
                    ));
                }
            }
        }

        let Some(texture) = texture else {
            show_welcome(ui, area);
            return;
        };

        let painter = ui.painter_at(area);
        painter.image(
            texture.id(),
            surface_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let to_screen = |p: &Point| {
            let (x, y) = surface_to_screen(p, rect_min, side, TARGET_SIZE);
            egui::pos2(x, y)
        };

        draw_reference_overlay(&painter, session, settings, &to_screen);
        draw_measurement_markers(&painter, session, settings, &to_screen);
    });

    // Status line
    ui.separator();
    ui.horizontal(|ui| {
        ui.label(format!("Mode: {}", session.mode().label()));
        ui.separator();
        match map_name {
            Some(name) => ui.label(format!("Map: {}", name)),
            None => ui.label("No map loaded"),
        };
    });

    action
}

/// Calibration line with perpendicular end caps, or lone grid endpoints.
fn draw_reference_overlay(
    painter: &egui::Painter,
    session: &Session,
    settings: &Settings,
    to_screen: &dyn Fn(&Point) -> egui::Pos2,
) {
    let stroke = egui::Stroke::new(settings.overlay.line_width, color(settings.overlay.color));
    let reference = session.calibration().reference();

    if let Some((start, end)) = reference.endpoints() {
        painter.line_segment([to_screen(&start), to_screen(&end)], stroke);
        for (c1, c2) in end_caps(&start, &end, settings.overlay.end_cap_length as f64) {
            painter.line_segment([to_screen(&c1), to_screen(&c2)], stroke);
        }
        return;
    }

    for point in [reference.a, reference.b].into_iter().flatten() {
        painter.circle_stroke(to_screen(&point), settings.overlay.end_cap_length / 2.0, stroke);
    }
}

fn draw_measurement_markers(
    painter: &egui::Painter,
    session: &Session,
    settings: &Settings,
    to_screen: &dyn Fn(&Point) -> egui::Pos2,
) {
    let measurement = session.calibration().measurement();
    let markers = [
        (measurement.a, settings.markers.start_color),
        (measurement.b, settings.markers.end_color),
    ];

    for (point, rgba) in markers {
        if let Some(point) = point {
            let pos = to_screen(&point);
            painter.circle_filled(pos, settings.markers.radius, color(rgba));
            painter.circle_stroke(
                pos,
                settings.markers.radius,
                egui::Stroke::new(1.0, egui::Color32::BLACK),
            );
        }
    }
}

/// Welcome message shown until a map is loaded.
fn show_welcome(ui: &mut egui::Ui, area: egui::Rect) {
    ui.allocate_ui_at_rect(area, |ui| {
        ui.centered_and_justified(|ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.heading(
                    egui::RichText::new("Rangefinder")
                        .size(32.0)
                        .color(egui::Color32::from_gray(200)),
                );
                ui.label(
                    egui::RichText::new("Map grid calibration and distance measurement")
                        .size(14.0)
                        .color(egui::Color32::from_gray(150)),
                );
                ui.add_space(20.0);
                ui.label(
                    egui::RichText::new("Open, paste or drop a map image")
                        .color(egui::Color32::from_gray(180)),
                );
                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new("File → Open Map...")
                        .weak()
                        .color(egui::Color32::from_gray(130)),
                );
            });
        });
    });
}
