//! Pointer input vocabulary. Modifier keys are tracked at the
//! application level and passed down with every pointer event, so a
//! modifier pressed before the cursor enters the canvas is still honored.

use kurbo::Point;

/// Modifier keys relevant to gestures. Shift constrains the pen to a
/// straight line and preserves aspect ratio during image resize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true };
}

/// A normalized pointer sample in canvas space. Mouse and single-touch
/// events both reduce to this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub position: Point,
    pub modifiers: Modifiers,
}

impl PointerInput {
    pub fn new(position: Point, modifiers: Modifiers) -> Self {
        Self {
            position,
            modifiers,
        }
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), Modifiers::NONE)
    }
}

/// Cursor shapes the host should display for move-tool feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Move,
    Grab,
    Grabbing,
    ResizeNs,
    ResizeEw,
    ResizeNesw,
    ResizeNwse,
}

impl Cursor {
    /// CSS cursor keyword, for hosts that map directly onto DOM styling.
    pub fn css_name(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Move => "move",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::ResizeNs => "ns-resize",
            Cursor::ResizeEw => "ew-resize",
            Cursor::ResizeNesw => "nesw-resize",
            Cursor::ResizeNwse => "nwse-resize",
        }
    }
}
