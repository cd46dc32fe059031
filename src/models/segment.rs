// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Point and segment data structures.
//!
//! Points live in display-surface pixel space (see [`crate::io::media::TARGET_SIZE`]).
//! Each segment endpoint is optional so that a point placed at the surface
//! origin is distinguishable from one that has not been placed yet.

use std::fmt;

/// A 2D point in display-surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.0}, {:.0})", self.x, self.y)
    }
}

/// Which end of a segment a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

/// Which of the two segments a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// The calibration segment spanning a known real-world length.
    Reference,
    /// The segment being measured.
    Measurement,
}

/// A pair of independently placed endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Segment {
    pub a: Option<Point>,
    pub b: Option<Point>,
}

impl Segment {
    /// Place (or move) one endpoint.
    pub fn set(&mut self, slot: Slot, point: Point) {
        match slot {
            Slot::A => self.a = Some(point),
            Slot::B => self.b = Some(point),
        }
    }

    pub fn get(&self, slot: Slot) -> Option<Point> {
        match slot {
            Slot::A => self.a,
            Slot::B => self.b,
        }
    }

    /// Forget both endpoints.
    pub fn clear(&mut self) {
        self.a = None;
        self.b = None;
    }

    /// Both endpoints, if both have been placed.
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match (self.a, self.b) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_none() && self.b.is_none()
    }

    /// Pixel length between the endpoints, if the segment is complete.
    pub fn pixel_length(&self) -> Option<f64> {
        self.endpoints().map(|(a, b)| a.distance_to(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_origin_point_counts_as_placed() {
        let mut segment = Segment::default();
        assert!(segment.is_empty());

        segment.set(Slot::A, Point::new(0.0, 0.0));
        assert!(!segment.is_empty());
        assert_eq!(segment.get(Slot::A), Some(Point::new(0.0, 0.0)));
        assert_eq!(segment.pixel_length(), None);

        segment.set(Slot::B, Point::new(0.0, 10.0));
        assert_eq!(segment.pixel_length(), Some(10.0));
    }

    #[test]
    fn test_set_replaces_and_clear_resets() {
        let mut segment = Segment::default();
        segment.set(Slot::B, Point::new(1.0, 1.0));
        segment.set(Slot::B, Point::new(2.0, 2.0));
        assert_eq!(segment.b, Some(Point::new(2.0, 2.0)));
        assert_eq!(segment.a, None);

        segment.clear();
        assert!(segment.is_empty());
        assert_eq!(segment.endpoints(), None);
    }
}
