// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with placement modes, the reference length field and the
//! distance readout.

use crate::models::session::InteractionMode;

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    Arm(InteractionMode),
    /// The reference length text was edited (fires on every keystroke).
    ReferenceLengthChanged,
}

/// Mode buttons in display order, with their highlight colors.
const MODE_BUTTONS: [(InteractionMode, &str, egui::Color32); 4] = [
    (
        InteractionMode::SettingMeasurementA,
        "📍 Start position",
        egui::Color32::from_rgb(0x86, 0xb6, 0xfe),
    ),
    (
        InteractionMode::SettingMeasurementB,
        "🎯 End position",
        egui::Color32::from_rgb(0xed, 0x6b, 0x6b),
    ),
    (
        InteractionMode::SettingReferenceA,
        "⊢ Grid start",
        egui::Color32::from_rgb(0x00, 0xff, 0xaa),
    ),
    (
        InteractionMode::SettingReferenceB,
        "⊣ Grid end",
        egui::Color32::from_rgb(0xff, 0x4d, 0x00),
    ),
];

/// Display the toolbar.
pub fn show(
    ui: &mut egui::Ui,
    mode: InteractionMode,
    reference_input: &mut String,
    distance_text: &str,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        for (button_mode, label, color) in MODE_BUTTONS {
            let button = if mode == button_mode {
                egui::Button::new(egui::RichText::new(label).color(egui::Color32::BLACK))
                    .fill(color)
            } else {
                egui::Button::new(label)
            };
            if ui.add(button).clicked() {
                action = ToolbarAction::Arm(button_mode);
            }
        }

        ui.separator();

        ui.label("Grid length:");
        let response = ui.add(
            egui::TextEdit::singleline(reference_input)
                .desired_width(70.0)
                .hint_text("meters"),
        );
        if response.changed() {
            action = ToolbarAction::ReferenceLengthChanged;
        }
        ui.label("m");

        ui.separator();

        ui.label("Distance:");
        ui.label(
            egui::RichText::new(format!("{} m", distance_text))
                .strong()
                .size(18.0),
        );
    });

    action
}
