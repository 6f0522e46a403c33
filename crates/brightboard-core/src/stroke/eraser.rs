//! Eraser stroke.

use super::pen::{bounds_of, polyline_hit};
use super::{StrokeGeometry, StrokeId};
use crate::color::Rgba;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The eraser paints at a multiple of the nominal stroke width.
pub const ERASER_WIDTH_FACTOR: f64 = 4.0;

/// An eraser pass. Stored like a pen polyline but rendered in
/// destination-out composite mode at `width * 4`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Eraser {
    pub(crate) id: StrokeId,
    pub points: Vec<Point>,
    /// Kept for undo fidelity; the eraser ignores color when painting.
    pub color: Rgba,
    pub width: f64,
}

impl Eraser {
    pub fn from_points(points: Vec<Point>, color: Rgba, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color,
            width,
        }
    }

    /// Effective painted line width.
    pub fn painted_width(&self) -> f64 {
        self.width * ERASER_WIDTH_FACTOR
    }
}

impl StrokeGeometry for Eraser {
    fn id(&self) -> StrokeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let half = self.painted_width() / 2.0;
        bounds_of(&self.points).inflate(half, half)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        polyline_hit(&self.points, point, tolerance + self.painted_width() / 2.0)
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_painted_width() {
        let e = Eraser::from_points(vec![Point::ZERO], Rgba::black(), 4.0);
        assert!((e.painted_width() - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds_include_painted_width() {
        let e = Eraser::from_points(
            vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0)],
            Rgba::black(),
            2.0,
        );
        // Painted width 8 inflates the box by 4 on each side
        let b = e.bounds();
        assert!((b.x0 - 6.0).abs() < f64::EPSILON);
        assert!((b.y1 - 14.0).abs() < f64::EPSILON);
    }
}
