//! Rectangle stroke.

use super::{StrokeGeometry, StrokeId};
use crate::color::Rgba;
use kurbo::{Point, Rect as Box2, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle described by the gesture's first and last points, interpreted
/// as opposite corners in either orientation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rect {
    pub(crate) id: StrokeId,
    pub start: Point,
    pub end: Point,
    pub color: Rgba,
    pub width: f64,
}

impl Rect {
    pub fn new(start: Point, end: Point, color: Rgba, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            color,
            width,
        }
    }

    /// Normalized box: (min x, min y) to (max x, max y).
    pub fn as_box(&self) -> Box2 {
        Box2::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }
}

impl StrokeGeometry for Rect {
    fn id(&self) -> StrokeId {
        self.id
    }

    fn bounds(&self) -> Box2 {
        self.as_box()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_box().inflate(tolerance, tolerance).contains(point)
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_normalization() {
        // Drawn from bottom-right to top-left
        let rect = Rect::new(
            Point::new(100.0, 80.0),
            Point::new(20.0, 10.0),
            Rgba::black(),
            2.0,
        );
        let b = rect.as_box();
        assert_eq!((b.x0, b.y0), (20.0, 10.0));
        assert_eq!((b.x1, b.y1), (100.0, 80.0));
    }

    #[test]
    fn test_containment() {
        let rect = Rect::new(Point::ZERO, Point::new(50.0, 50.0), Rgba::black(), 2.0);
        assert!(rect.hit_test(Point::new(25.0, 25.0), 0.0));
        assert!(!rect.hit_test(Point::new(60.0, 25.0), 0.0));
    }
}
