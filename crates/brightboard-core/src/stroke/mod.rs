//! Stroke definitions for the whiteboard.

mod ai_text;
mod circle;
mod eraser;
mod image;
mod pen;
mod rect;
mod text;

pub use ai_text::{AiText, AssistPointId, AI_TEXT_FONT_SIZE};
pub use circle::{Circle, CIRCLE_HIT_TOLERANCE};
pub use eraser::{Eraser, ERASER_WIDTH_FACTOR};
pub use image::{Image, ImageFormat, MAX_INSERT_WIDTH_RATIO};
pub use pen::{Pen, HANDWRITING_MIN_POINTS};
pub use rect::Rect;
pub use text::{Text, GLYPH_ADVANCE_RATIO};

use crate::color::Rgba;
use kurbo::{Point, Rect as Box2, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for strokes.
pub type StrokeId = Uuid;

/// Tool tags. `Move` selects and manipulates existing strokes and never
/// produces a persisted stroke; `AiText` strokes are created by the
/// assistance subsystem, not by a user tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
    Rectangle,
    Circle,
    Text,
    AiText,
    Image,
    Move,
}

/// Common behavior shared by all stroke variants.
pub trait StrokeGeometry {
    /// Get the unique identifier.
    fn id(&self) -> StrokeId;

    /// Get the bounding box.
    fn bounds(&self) -> Box2;

    /// Check if a point hits this stroke.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Translate the stroke by a delta.
    fn translate(&mut self, delta: Vec2);
}

/// Tagged union of all stroke types. Paint order is the owning list's
/// insertion order (back to front).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stroke {
    Pen(Pen),
    Eraser(Eraser),
    Rect(Rect),
    Circle(Circle),
    Text(Text),
    AiText(AiText),
    Image(Image),
}

impl Stroke {
    pub fn id(&self) -> StrokeId {
        match self {
            Stroke::Pen(s) => s.id(),
            Stroke::Eraser(s) => s.id(),
            Stroke::Rect(s) => s.id(),
            Stroke::Circle(s) => s.id(),
            Stroke::Text(s) => s.id(),
            Stroke::AiText(s) => s.id(),
            Stroke::Image(s) => s.id(),
        }
    }

    pub fn tool(&self) -> ToolKind {
        match self {
            Stroke::Pen(_) => ToolKind::Pen,
            Stroke::Eraser(_) => ToolKind::Eraser,
            Stroke::Rect(_) => ToolKind::Rectangle,
            Stroke::Circle(_) => ToolKind::Circle,
            Stroke::Text(_) => ToolKind::Text,
            Stroke::AiText(_) => ToolKind::AiText,
            Stroke::Image(_) => ToolKind::Image,
        }
    }

    pub fn bounds(&self) -> Box2 {
        match self {
            Stroke::Pen(s) => s.bounds(),
            Stroke::Eraser(s) => s.bounds(),
            Stroke::Rect(s) => s.bounds(),
            Stroke::Circle(s) => s.bounds(),
            Stroke::Text(s) => s.bounds(),
            Stroke::AiText(s) => s.bounds(),
            Stroke::Image(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Stroke::Pen(s) => s.hit_test(point, tolerance),
            Stroke::Eraser(s) => s.hit_test(point, tolerance),
            Stroke::Rect(s) => s.hit_test(point, tolerance),
            Stroke::Circle(s) => s.hit_test(point, tolerance),
            Stroke::Text(s) => s.hit_test(point, tolerance),
            Stroke::AiText(s) => s.hit_test(point, tolerance),
            Stroke::Image(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Stroke::Pen(s) => s.translate(delta),
            Stroke::Eraser(s) => s.translate(delta),
            Stroke::Rect(s) => s.translate(delta),
            Stroke::Circle(s) => s.translate(delta),
            Stroke::Text(s) => s.translate(delta),
            Stroke::AiText(s) => s.translate(delta),
            Stroke::Image(s) => s.translate(delta),
        }
    }

    /// Stroke color. Images carry no stroke color and report opaque black,
    /// which only matters for their optional selection border.
    pub fn color(&self) -> Rgba {
        match self {
            Stroke::Pen(s) => s.color,
            Stroke::Eraser(s) => s.color,
            Stroke::Rect(s) => s.color,
            Stroke::Circle(s) => s.color,
            Stroke::Text(s) => s.color,
            Stroke::AiText(s) => s.color,
            Stroke::Image(_) => Rgba::black(),
        }
    }

    /// Nominal stroke width. Scales the eraser (x4) and text sizing.
    pub fn width(&self) -> f64 {
        match self {
            Stroke::Pen(s) => s.width,
            Stroke::Eraser(s) => s.width,
            Stroke::Rect(s) => s.width,
            Stroke::Circle(s) => s.width,
            Stroke::Text(s) => s.width,
            Stroke::AiText(s) => s.width,
            Stroke::Image(_) => 0.0,
        }
    }

    /// The stroke's origin point: first path point for polylines, first
    /// recorded corner for shapes, anchor for text, top-left for images.
    /// This is the reference the move tool drags against.
    pub fn origin(&self) -> Point {
        match self {
            Stroke::Pen(s) => s.points.first().copied().unwrap_or(Point::ZERO),
            Stroke::Eraser(s) => s.points.first().copied().unwrap_or(Point::ZERO),
            Stroke::Rect(s) => s.start,
            Stroke::Circle(s) => s.start,
            Stroke::Text(s) => s.anchor,
            Stroke::AiText(s) => s.anchor,
            Stroke::Image(s) => s.position,
        }
    }

    /// Number of sampled path points (1 for anchored strokes, 2 for shapes).
    pub fn path_len(&self) -> usize {
        match self {
            Stroke::Pen(s) => s.points.len(),
            Stroke::Eraser(s) => s.points.len(),
            Stroke::Rect(_) | Stroke::Circle(_) => 2,
            Stroke::Text(_) | Stroke::AiText(_) | Stroke::Image(_) => 1,
        }
    }

    /// A stroke with no geometry at all; the renderer skips these.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Stroke::Pen(s) => s.points.is_empty(),
            Stroke::Eraser(s) => s.points.is_empty(),
            _ => false,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Stroke::Image(_))
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Stroke::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_ai_text(&self) -> Option<&AiText> {
        match self {
            Stroke::AiText(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_ai_text_mut(&mut self) -> Option<&mut AiText> {
        match self {
            Stroke::AiText(t) => Some(t),
            _ => None,
        }
    }

    /// Regenerate the stroke's ID. Used when duplicating a page so copies
    /// stay unique within the session.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Stroke::Pen(s) => s.id = new_id,
            Stroke::Eraser(s) => s.id = new_id,
            Stroke::Rect(s) => s.id = new_id,
            Stroke::Circle(s) => s.id = new_id,
            Stroke::Text(s) => s.id = new_id,
            Stroke::AiText(s) => s.id = new_id,
            Stroke::Image(s) => s.id = new_id,
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!((point_to_segment_dist(Point::new(50.0, 10.0), a, b) - 10.0).abs() < 1e-9);
        // Beyond the endpoint, distance is to the endpoint itself
        assert!((point_to_segment_dist(Point::new(110.0, 0.0), a, b) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Point::new(3.0, 4.0);
        let d = point_to_segment_dist(p, Point::ZERO, Point::ZERO);
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_origin_per_variant() {
        let pen = Stroke::Pen(Pen::from_points(
            vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
            Rgba::black(),
            4.0,
        ));
        assert_eq!(pen.origin(), Point::new(1.0, 2.0));

        let rect = Stroke::Rect(Rect::new(
            Point::new(10.0, 10.0),
            Point::new(0.0, 0.0),
            Rgba::black(),
            2.0,
        ));
        assert_eq!(rect.origin(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_regenerate_id() {
        let mut pen = Stroke::Pen(Pen::from_points(vec![Point::ZERO], Rgba::black(), 4.0));
        let old = pen.id();
        pen.regenerate_id();
        assert_ne!(old, pen.id());
    }

    #[test]
    fn test_json_round_trip() {
        let stroke = Stroke::Circle(Circle::new(
            Point::new(2.0, 3.0),
            Point::new(10.0, 3.0),
            Rgba::black(),
            2.5,
        ));
        let json = serde_json::to_string(&stroke).unwrap();
        let back: Stroke = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), stroke.id());
        let Stroke::Circle(circle) = back else { panic!() };
        assert_eq!(circle.center(), Point::new(6.0, 3.0));
        assert_eq!(circle.width, 2.5);
    }
}
