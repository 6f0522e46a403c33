//! AI-generated hint text stroke.
//!
//! The canvas renderer skips these; they are drawn by a separate overlay
//! capable of math/markdown layout. The stroke still participates in the
//! store (ordering, undo, hit-testing) like any other.

use super::text::GLYPH_ADVANCE_RATIO;
use super::{StrokeGeometry, StrokeId};
use crate::color::Rgba;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of the assistance point a hint belongs to.
pub type AssistPointId = Uuid;

/// Font size the overlay renders AI hints at.
pub const AI_TEXT_FONT_SIZE: f64 = 16.0;

/// An AI hint block anchored at its top-left corner. `text` grows one
/// character per typing tick until it equals `full_text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiText {
    pub(crate) id: StrokeId,
    /// Top-left of the wrapped block.
    pub anchor: Point,
    /// Text revealed so far.
    pub text: String,
    /// Complete hint text.
    pub full_text: String,
    /// Set while the typing animation is running.
    pub is_typing: bool,
    /// Weak back-reference to the assistance point that spawned this hint.
    pub assist_point: Option<AssistPointId>,
    pub color: Rgba,
    pub width: f64,
}

impl AiText {
    /// Create a hint stroke with no text revealed yet.
    pub fn new(anchor: Point, full_text: String, assist_point: AssistPointId) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor,
            text: String::new(),
            full_text,
            is_typing: true,
            assist_point: Some(assist_point),
            color: Rgba::ai_blue(),
            width: 2.0,
        }
    }

    /// Reveal the next character. Returns false once the full text is shown.
    pub fn reveal_next(&mut self) -> bool {
        let shown = self.text.chars().count();
        match self.full_text.chars().nth(shown) {
            Some(c) => {
                self.text.push(c);
                self.text.chars().count() < self.full_text.chars().count()
            }
            None => false,
        }
    }

    /// Skip the animation and show everything.
    pub fn finish_typing(&mut self) {
        self.text = self.full_text.clone();
        self.is_typing = false;
    }
}

impl StrokeGeometry for AiText {
    fn id(&self) -> StrokeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        // Top-left anchor; estimate from the full text so the box is stable
        // while typing
        let w = self.full_text.chars().count() as f64 * AI_TEXT_FONT_SIZE * GLYPH_ADVANCE_RATIO;
        Rect::new(
            self.anchor.x,
            self.anchor.y,
            self.anchor.x + w,
            self.anchor.y + AI_TEXT_FONT_SIZE,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn translate(&mut self, delta: Vec2) {
        self.anchor += delta;
    }
}
