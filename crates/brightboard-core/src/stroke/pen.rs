//! Freehand pen stroke.

use super::{StrokeGeometry, StrokeId, point_to_polyline_dist};
use crate::color::Rgba;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum number of path points for a pen stroke to count as handwriting
/// and qualify for an assistance sparkle.
pub const HANDWRITING_MIN_POINTS: usize = 6;

/// A handwritten pen stroke (polyline of sampled points).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pen {
    pub(crate) id: StrokeId,
    /// Points sampled during the gesture.
    pub points: Vec<Point>,
    pub color: Rgba,
    pub width: f64,
}

impl Pen {
    pub fn from_points(points: Vec<Point>, color: Rgba, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color,
            width,
        }
    }

    /// Whether the stroke is long enough to be treated as handwriting.
    pub fn is_handwriting(&self) -> bool {
        self.points.len() >= HANDWRITING_MIN_POINTS
    }

    /// Last sampled point, where the sparkle anchors.
    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

impl StrokeGeometry for Pen {
    fn id(&self) -> StrokeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        bounds_of(&self.points)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        polyline_hit(&self.points, point, tolerance + self.width / 2.0)
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }
}

/// Bounding box of a point list; `Rect::ZERO` when empty.
pub(crate) fn bounds_of(points: &[Point]) -> Rect {
    if points.is_empty() {
        return Rect::ZERO;
    }
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Hit test against a polyline with the given tolerance.
pub(crate) fn polyline_hit(points: &[Point], point: Point, tolerance: f64) -> bool {
    match points.len() {
        0 => false,
        1 => {
            let p = points[0];
            let dx = point.x - p.x;
            let dy = point.y - p.y;
            (dx * dx + dy * dy).sqrt() <= tolerance
        }
        _ => point_to_polyline_dist(point, points) <= tolerance,
    }
}
