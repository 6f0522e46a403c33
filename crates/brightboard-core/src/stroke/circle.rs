//! Circle stroke.

use super::{StrokeGeometry, StrokeId};
use crate::color::Rgba;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Extra slack when hit-testing circles so thin rings remain grabbable.
pub const CIRCLE_HIT_TOLERANCE: f64 = 5.0;

/// A circle described by the gesture's first and last points: center at their
/// midpoint, radius half the distance between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: StrokeId,
    pub start: Point,
    pub end: Point,
    pub color: Rgba,
    pub width: f64,
}

impl Circle {
    pub fn new(start: Point, end: Point, color: Rgba, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            color,
            width,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    pub fn radius(&self) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        (dx * dx + dy * dy).sqrt() / 2.0
    }
}

impl StrokeGeometry for Circle {
    fn id(&self) -> StrokeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let c = self.center();
        let r = self.radius();
        Rect::new(c.x - r, c.y - r, c.x + r, c.y + r)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let c = self.center();
        let dx = point.x - c.x;
        let dy = point.y - c.y;
        (dx * dx + dy * dy).sqrt() <= self.radius() + tolerance + CIRCLE_HIT_TOLERANCE
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}
