//! AI assistance affordances. An [`AssistancePoint`] is the sparkle that
//! appears after a handwriting pause; the session drives its lifecycle
//! through `visible -> loading -> typing -> settled`, with removal of the
//! generated hint dropping it back to `visible`.

use crate::clock::Millis;
use crate::stroke::AssistPointId;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quiet period after a qualifying pen stroke before the sparkle shows.
pub const SPARKLE_ARM_DELAY_MS: Millis = 3000;

/// Sparkle offset from the triggering stroke's last point.
pub const SPARKLE_OFFSET: Vec2 = Vec2::new(20.0, -10.0);

/// Hint text anchor offset from the sparkle position.
pub const AI_TEXT_OFFSET: Vec2 = Vec2::new(30.0, 5.0);

/// Delay before the first typed character.
pub const TYPE_FIRST_DELAY_MS: Millis = 300;

/// Delay between subsequent typed characters.
pub const TYPE_TICK_MS: Millis = 100;

/// Where an assistance point is in its lifecycle. The phases are
/// mutually exclusive; `Settled` is the only one with the sparkle hidden
/// for good (until the hint is removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AssistPhase {
    /// Sparkle showing, awaiting a click.
    #[default]
    Visible,
    /// Analysis request in flight; sparkle hidden to block double-invocation.
    Loading,
    /// Hint text animating onto the canvas.
    Typing,
    /// Hint fully revealed; sparkle hidden.
    Settled,
}

/// An ephemeral sparkle tied to one pen stroke. At most one exists at a
/// time across the live page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistancePoint {
    pub id: AssistPointId,
    /// Screen position, offset from the triggering stroke's last point.
    pub position: Point,
    /// Weak reference to the pen stroke that triggered this point.
    pub stroke: crate::stroke::StrokeId,
    pub phase: AssistPhase,
    /// Mirrors the hint stroke's revealed text during typing.
    pub current_text: String,
}

impl AssistancePoint {
    /// Build a point for a pen stroke ending at `last_point`.
    pub fn for_stroke(stroke: crate::stroke::StrokeId, last_point: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: last_point + SPARKLE_OFFSET,
            stroke,
            phase: AssistPhase::default(),
            current_text: String::new(),
        }
    }

    /// Whether the sparkle affordance should be drawn.
    pub fn sparkle_visible(&self) -> bool {
        self.phase == AssistPhase::Visible
    }

    /// Anchor for the hint stroke this point will spawn.
    pub fn text_anchor(&self) -> Point {
        self.position + AI_TEXT_OFFSET
    }

    /// Drop back to a fresh, clickable sparkle after hint removal.
    pub fn reset(&mut self) {
        self.phase = AssistPhase::Visible;
        self.current_text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_offset() {
        let point = AssistancePoint::for_stroke(Uuid::new_v4(), Point::new(100.0, 100.0));
        assert_eq!(point.position, Point::new(120.0, 90.0));
        assert_eq!(point.text_anchor(), Point::new(150.0, 95.0));
    }

    #[test]
    fn test_reset_after_settling() {
        let mut point = AssistancePoint::for_stroke(Uuid::new_v4(), Point::ZERO);
        point.phase = AssistPhase::Settled;
        point.current_text = "hint".into();
        assert!(!point.sparkle_visible());
        point.reset();
        assert!(point.sparkle_visible());
        assert!(point.current_text.is_empty());
    }
}
