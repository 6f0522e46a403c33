//! User-typed text stroke.

use super::{StrokeGeometry, StrokeId};
use crate::color::Rgba;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Average glyph advance as a fraction of the font size. Used to estimate
/// text bounds without a font stack.
pub const GLYPH_ADVANCE_RATIO: f64 = 0.55;

/// A single line of user text anchored at its baseline-left point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: StrokeId,
    /// Baseline-left anchor.
    pub anchor: Point,
    pub text: String,
    pub color: Rgba,
    pub width: f64,
}

impl Text {
    pub fn new(anchor: Point, text: String, color: Rgba, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor,
            text,
            color,
            width,
        }
    }

    /// Font size derived from the nominal stroke width.
    pub fn font_size(&self) -> f64 {
        (self.width * 4.0).max(12.0)
    }

    /// Estimated rendered width from character count.
    pub fn estimated_width(&self) -> f64 {
        self.text.chars().count() as f64 * self.font_size() * GLYPH_ADVANCE_RATIO
    }
}

impl StrokeGeometry for Text {
    fn id(&self) -> StrokeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        // Baseline-left anchor: the glyph box sits above the anchor
        Rect::new(
            self.anchor.x,
            self.anchor.y - self.font_size(),
            self.anchor.x + self.estimated_width(),
            self.anchor.y,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn translate(&mut self, delta: Vec2) {
        self.anchor += delta;
    }
}
