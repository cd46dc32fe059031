// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Calibration and distance engine.
//!
//! Converts pixel-space segments into real-world distances. A reference
//! segment of known length yields a meters-per-pixel scale factor, which is
//! then applied to the measurement segment. Nothing here touches a rendering
//! surface; every degenerate input falls back to the identity scale or a
//! zero distance instead of failing.

use super::segment::{Point, Segment, Slot};

/// Fixed multiplier correcting the projection skew of the source map imagery.
pub const CORRECTION_CONSTANT: f64 = 1.12;

/// Scale factor used whenever no valid calibration is available.
pub const IDENTITY_SCALE: f64 = 1.0;

/// Derive meters-per-pixel from a reference segment and its real-world length.
pub fn scale_factor(reference: &Segment, reference_length_m: Option<f64>) -> f64 {
    let Some(pixel_length) = reference.pixel_length() else {
        return IDENTITY_SCALE;
    };

    match reference_length_m {
        Some(meters) if pixel_length > 0.0 && meters > 0.0 => meters / pixel_length,
        _ => IDENTITY_SCALE,
    }
}

/// Format a non-negative distance with one decimal.
///
/// Rounding is done on the exact binary value, so `0.15` (stored just below
/// the half) reads `0.1`. Exact halves such as `0.25` round up, not to even.
pub fn format_tenths(value: f64) -> String {
    let twentieths = value * 20.0;
    let exact = value.mul_add(20.0, -twentieths) == 0.0;
    if exact && twentieths.fract() == 0.0 && twentieths % 2.0 == 1.0 {
        let tenths = (twentieths + 1.0) / 2.0;
        return format!("{:.1}", tenths / 10.0);
    }
    format!("{:.1}", value)
}

/// Parse the reference length field the way a lenient float prefix parser
/// would: leading whitespace is skipped and trailing garbage ("50m") ignored.
pub fn parse_reference_length(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Calibration state: both segments, the reference length and the derived values.
#[derive(Debug, Clone)]
pub struct Calibration {
    reference: Segment,
    measurement: Segment,
    reference_length_m: Option<f64>,
    scale_factor: f64,
    /// `None` while there is nothing to measure.
    distance_m: Option<f64>,
    map_loaded: bool,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}

impl Calibration {
    pub fn new() -> Self {
        Self {
            reference: Segment::default(),
            measurement: Segment::default(),
            reference_length_m: None,
            scale_factor: IDENTITY_SCALE,
            distance_m: None,
            map_loaded: false,
        }
    }

    pub fn reference(&self) -> &Segment {
        &self.reference
    }

    pub fn measurement(&self) -> &Segment {
        &self.measurement
    }

    pub fn reference_length(&self) -> Option<f64> {
        self.reference_length_m
    }

    /// Current meters-per-pixel scale.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Last computed distance in meters, unrounded.
    pub fn distance(&self) -> f64 {
        self.distance_m.unwrap_or(0.0)
    }

    pub fn is_map_loaded(&self) -> bool {
        self.map_loaded
    }

    /// Distance formatted for the readout: a bare `0` when nothing is measured.
    pub fn distance_text(&self) -> String {
        match self.distance_m {
            Some(meters) => format_tenths(meters),
            None => "0".to_string(),
        }
    }

    /// Place a reference endpoint and re-derive the scale factor.
    pub fn set_reference_point(&mut self, slot: Slot, point: Point) {
        self.reference.set(slot, point);
        self.recompute_scale_factor();
    }

    /// Place a measurement endpoint and recompute the distance.
    pub fn set_measurement_point(&mut self, slot: Slot, point: Point) {
        self.measurement.set(slot, point);
        self.compute_distance();
    }

    /// Record a new reference length (`None` for unparseable input) and re-derive.
    pub fn set_reference_length(&mut self, meters: Option<f64>) {
        self.reference_length_m = meters;
        self.recompute_scale_factor();
    }

    /// Re-derive the scale factor from the reference segment, then the distance.
    pub fn recompute_scale_factor(&mut self) -> f64 {
        let previous = self.scale_factor;
        self.scale_factor = scale_factor(&self.reference, self.reference_length_m);
        if self.scale_factor != previous {
            log::info!("Scale factor {:.6} -> {:.6} m/px", previous, self.scale_factor);
        }
        self.compute_distance();
        self.scale_factor
    }

    /// Recompute the measured distance from the current scale factor.
    pub fn compute_distance(&mut self) -> f64 {
        self.distance_m = match self.measurement.pixel_length() {
            Some(pixel_length) if self.map_loaded => {
                Some(pixel_length * self.scale_factor * CORRECTION_CONSTANT)
            }
            _ => None,
        };
        self.distance()
    }

    /// A new map has been fitted to the surface.
    ///
    /// Measurement points are discarded; the reference segment, reference
    /// length and scale factor carry over to the new map.
    pub fn map_loaded(&mut self) {
        self.map_loaded = true;
        self.measurement.clear();
        self.recompute_scale_factor();
    }
}
