// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Conversions between screen positions and display-surface pixels, and the
//! end-cap geometry of the calibration overlay.

use crate::models::segment::Point;

/// Convert a screen position inside `rect_min`/`rect_size` to surface pixels.
///
/// The surface is square with side `surface_size`, drawn uniformly scaled
/// into a square screen rect.
pub fn screen_to_surface(
    screen: (f32, f32),
    rect_min: (f32, f32),
    rect_size: f32,
    surface_size: u32,
) -> Point {
    let scale = surface_size as f64 / rect_size as f64;
    Point {
        x: (screen.0 - rect_min.0) as f64 * scale,
        y: (screen.1 - rect_min.1) as f64 * scale,
    }
}

/// Convert surface pixels back to a screen position.
pub fn surface_to_screen(
    point: &Point,
    rect_min: (f32, f32),
    rect_size: f32,
    surface_size: u32,
) -> (f32, f32) {
    let scale = rect_size as f64 / surface_size as f64;
    (
        rect_min.0 + (point.x * scale) as f32,
        rect_min.1 + (point.y * scale) as f32,
    )
}

/// Perpendicular end caps for the segment `start`..`end`.
///
/// Each cap is `cap_length` long and centered on its endpoint. A zero-length
/// segment gets vertical caps (`atan2(0, 0) == 0`).
pub fn end_caps(start: &Point, end: &Point, cap_length: f64) -> [(Point, Point); 2] {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let perp = angle + std::f64::consts::FRAC_PI_2;
    let (ox, oy) = (perp.cos() * cap_length / 2.0, perp.sin() * cap_length / 2.0);

    let cap = |p: &Point| {
        (
            Point::new(p.x + ox, p.y + oy),
            Point::new(p.x - ox, p.y - oy),
        )
    };
    [cap(start), cap(end)]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_screen_surface_roundtrip() {
        let rect_min = (120.0, 40.0);
        let rect_size = 600.0;

        let point = screen_to_surface((420.0, 190.0), rect_min, rect_size, 800);
        assert!((point.x - 400.0).abs() < 1e-4);
        assert!((point.y - 200.0).abs() < 1e-4);

        let (sx, sy) = surface_to_screen(&point, rect_min, rect_size, 800);
        assert!((sx - 420.0).abs() < 1e-3);
        assert!((sy - 190.0).abs() < 1e-3);
    }

    #[test]
    fn test_screen_corners() {
        let tl = screen_to_surface((10.0, 10.0), (10.0, 10.0), 400.0, 800);
        assert_eq!(tl, Point::new(0.0, 0.0));

        let br = screen_to_surface((410.0, 410.0), (10.0, 10.0), 400.0, 800);
        assert_eq!(br, Point::new(800.0, 800.0));
    }

    #[test]
    fn test_end_caps_horizontal_segment() {
        let [(a1, a2), (b1, b2)] = end_caps(&Point::new(0.0, 0.0), &Point::new(100.0, 0.0), 10.0);
        assert!((a1.x - 0.0).abs() < EPS && (a1.y - 5.0).abs() < EPS);
        assert!((a2.x - 0.0).abs() < EPS && (a2.y + 5.0).abs() < EPS);
        assert!((b1.x - 100.0).abs() < EPS && (b1.y - 5.0).abs() < EPS);
        assert!((b2.x - 100.0).abs() < EPS && (b2.y + 5.0).abs() < EPS);
    }

    #[test]
    fn test_end_caps_are_perpendicular_and_centered() {
        let start = Point::new(30.0, 40.0);
        let end = Point::new(130.0, 115.0);
        let (dx, dy) = (end.x - start.x, end.y - start.y);

        for (endpoint, (c1, c2)) in [start, end].iter().zip(end_caps(&start, &end, 12.0)) {
            let (cx, cy) = (c2.x - c1.x, c2.y - c1.y);
            assert!((cx * dx + cy * dy).abs() < 1e-6);
            assert!((c1.distance_to(&c2) - 12.0).abs() < EPS);
            assert!(((c1.x + c2.x) / 2.0 - endpoint.x).abs() < EPS);
            assert!(((c1.y + c2.y) / 2.0 - endpoint.y).abs() < EPS);
        }
    }

    #[test]
    fn test_end_caps_degenerate_segment() {
        let p = Point::new(50.0, 50.0);
        let [(c1, c2), _] = end_caps(&p, &p, 10.0);
        assert!((c1.x - 50.0).abs() < EPS && (c1.y - 55.0).abs() < EPS);
        assert!((c2.x - 50.0).abs() < EPS && (c2.y - 45.0).abs() < EPS);
    }
}
