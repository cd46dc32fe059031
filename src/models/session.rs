// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interaction session state.
//!
//! The session owns the calibration engine and the single active placement
//! mode, and routes surface clicks to the right segment endpoint.

use super::calibration::{parse_reference_length, Calibration};
use super::segment::{Point, SegmentKind, Slot};

/// Which point the next click on the map will place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    None,
    SettingReferenceA,
    SettingReferenceB,
    SettingMeasurementA,
    SettingMeasurementB,
}

impl InteractionMode {
    /// The segment endpoint this mode places, if any.
    pub fn target(self) -> Option<(SegmentKind, Slot)> {
        match self {
            InteractionMode::None => None,
            InteractionMode::SettingReferenceA => Some((SegmentKind::Reference, Slot::A)),
            InteractionMode::SettingReferenceB => Some((SegmentKind::Reference, Slot::B)),
            InteractionMode::SettingMeasurementA => Some((SegmentKind::Measurement, Slot::A)),
            InteractionMode::SettingMeasurementB => Some((SegmentKind::Measurement, Slot::B)),
        }
    }

    /// Short human-readable label for status lines.
    pub fn label(self) -> &'static str {
        match self {
            InteractionMode::None => "Idle",
            InteractionMode::SettingReferenceA => "Placing grid start",
            InteractionMode::SettingReferenceB => "Placing grid end",
            InteractionMode::SettingMeasurementA => "Placing start position",
            InteractionMode::SettingMeasurementB => "Placing end position",
        }
    }
}

/// Outcome of a click on the display surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// No mode was armed; nothing changed.
    Ignored,
    /// A mode was armed but there is no map to place on; the mode stays armed.
    NoMap,
    /// The point was stored and the mode returned to idle.
    Placed(SegmentKind, Slot, Point),
}

/// Explicit replacement for the scattered position/mode globals of a
/// single-page measurement tool.
#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: InteractionMode,
    calibration: Calibration,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Arm a placement mode. Only one mode is ever active.
    pub fn arm(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            log::debug!("Mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Handle a click at `point` in surface coordinates.
    pub fn click(&mut self, point: Point) -> Placement {
        let Some((kind, slot)) = self.mode.target() else {
            return Placement::Ignored;
        };

        if !self.calibration.is_map_loaded() {
            log::warn!("Click at {} ignored: no map loaded", point);
            return Placement::NoMap;
        }

        self.mode = InteractionMode::None;
        self.set_point(kind, slot, point);
        Placement::Placed(kind, slot, point)
    }

    /// Store a point directly, bypassing the interaction mode.
    pub fn set_point(&mut self, kind: SegmentKind, slot: Slot, point: Point) {
        log::info!("Placed {:?} {:?} at {}", kind, slot, point);
        match kind {
            SegmentKind::Reference => self.calibration.set_reference_point(slot, point),
            SegmentKind::Measurement => self.calibration.set_measurement_point(slot, point),
        }
        log::info!("Distance: {} m", self.calibration.distance_text());
    }

    /// Set the reference length in meters. `None` degrades the calibration
    /// to the identity scale.
    pub fn set_reference_length(&mut self, meters: Option<f64>) {
        match meters {
            Some(meters) => log::debug!("Reference length set to {} m", meters),
            None => log::debug!("Reference length cleared"),
        }
        self.calibration.set_reference_length(meters);
    }

    /// Set the reference length from raw field text.
    pub fn set_reference_length_text(&mut self, text: &str) {
        self.set_reference_length(parse_reference_length(text));
    }

    /// A freshly fitted map is on the surface.
    pub fn map_loaded(&mut self) {
        self.calibration.map_loaded();
    }
}
