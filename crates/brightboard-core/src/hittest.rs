//! Hit-testing and movement math for the move tool. Everything here is
//! pure; the tool gesture layer owns the mutation.

use crate::input::Cursor;
use crate::stroke::{Image, Stroke, StrokeId};
use kurbo::{Point, Rect, Vec2};

/// Default pick tolerance for stroke bodies, in canvas units.
pub const HIT_TOLERANCE: f64 = 5.0;

/// Pick radius around a resize handle's center.
pub const HANDLE_TOLERANCE: f64 = 10.0;

/// Smallest width/height an image may be resized to.
pub const MIN_RESIZE_SIZE: f64 = 10.0;

/// Topmost-first stroke lookup. Later strokes paint over earlier ones,
/// so the scan runs back to front.
pub fn find_stroke_at(strokes: &[Stroke], point: Point) -> Option<&Stroke> {
    strokes
        .iter()
        .rev()
        .find(|s| s.hit_test(point, HIT_TOLERANCE))
}

/// Offset from the pointer to the grabbed stroke's origin, captured on
/// pointer-down so the stroke doesn't jump to the cursor.
pub fn drag_offset(pointer: Point, origin: Point) -> Vec2 {
    pointer - origin
}

/// Where the stroke's origin should be for the current pointer position.
pub fn new_origin(pointer: Point, offset: Vec2) -> Point {
    pointer - offset
}

/// Translation to apply given where the origin was and where it should be.
pub fn movement_delta(old_origin: Point, new_origin: Point) -> Vec2 {
    new_origin - old_origin
}

/// The eight resize handles around a selected image, named by compass
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::North,
        ResizeHandle::NorthEast,
        ResizeHandle::East,
        ResizeHandle::SouthEast,
        ResizeHandle::South,
        ResizeHandle::SouthWest,
        ResizeHandle::West,
    ];

    /// Handle center on the given box.
    pub fn position(&self, bounds: Rect) -> Point {
        let cx = (bounds.x0 + bounds.x1) / 2.0;
        let cy = (bounds.y0 + bounds.y1) / 2.0;
        match self {
            ResizeHandle::NorthWest => Point::new(bounds.x0, bounds.y0),
            ResizeHandle::North => Point::new(cx, bounds.y0),
            ResizeHandle::NorthEast => Point::new(bounds.x1, bounds.y0),
            ResizeHandle::East => Point::new(bounds.x1, cy),
            ResizeHandle::SouthEast => Point::new(bounds.x1, bounds.y1),
            ResizeHandle::South => Point::new(cx, bounds.y1),
            ResizeHandle::SouthWest => Point::new(bounds.x0, bounds.y1),
            ResizeHandle::West => Point::new(bounds.x0, cy),
        }
    }

    pub fn cursor(&self) -> Cursor {
        match self {
            ResizeHandle::North | ResizeHandle::South => Cursor::ResizeNs,
            ResizeHandle::East | ResizeHandle::West => Cursor::ResizeEw,
            ResizeHandle::NorthEast | ResizeHandle::SouthWest => Cursor::ResizeNesw,
            ResizeHandle::NorthWest | ResizeHandle::SouthEast => Cursor::ResizeNwse,
        }
    }

    fn moves_left(&self) -> bool {
        matches!(
            self,
            ResizeHandle::NorthWest | ResizeHandle::West | ResizeHandle::SouthWest
        )
    }

    fn moves_right(&self) -> bool {
        matches!(
            self,
            ResizeHandle::NorthEast | ResizeHandle::East | ResizeHandle::SouthEast
        )
    }

    fn moves_top(&self) -> bool {
        matches!(
            self,
            ResizeHandle::NorthWest | ResizeHandle::North | ResizeHandle::NorthEast
        )
    }

    fn moves_bottom(&self) -> bool {
        matches!(
            self,
            ResizeHandle::SouthWest | ResizeHandle::South | ResizeHandle::SouthEast
        )
    }

    fn is_corner(&self) -> bool {
        matches!(
            self,
            ResizeHandle::NorthWest
                | ResizeHandle::NorthEast
                | ResizeHandle::SouthEast
                | ResizeHandle::SouthWest
        )
    }
}

/// Which handle of a selected image, if any, the pointer is over.
pub fn handle_at(image: &Image, point: Point) -> Option<ResizeHandle> {
    let bounds = image.as_rect();
    ResizeHandle::ALL
        .into_iter()
        .find(|h| h.position(bounds).distance(point) <= HANDLE_TOLERANCE)
}

/// Hover feedback for the move tool: directional cursor over a handle of
/// the selected image, grab over any stroke body, and the generic move
/// cursor over empty canvas.
pub fn hover_cursor(strokes: &[Stroke], selected: Option<StrokeId>, point: Point) -> Cursor {
    if let Some(id) = selected {
        if let Some(image) = strokes
            .iter()
            .find(|s| s.id() == id)
            .and_then(|s| s.as_image())
        {
            if let Some(handle) = handle_at(image, point) {
                return handle.cursor();
            }
        }
    }
    if find_stroke_at(strokes, point).is_some() {
        Cursor::Grab
    } else {
        Cursor::Move
    }
}

/// Recompute an image's box given the handle being dragged and the
/// current pointer position. Edge handles move one edge; corner handles
/// move two. With `preserve_aspect`, corner drags keep the original box's
/// aspect ratio, anchored at the opposite corner. The box never shrinks
/// below [`MIN_RESIZE_SIZE`] on either axis.
pub fn resize_box(
    handle: ResizeHandle,
    original: Rect,
    pointer: Point,
    preserve_aspect: bool,
) -> Rect {
    let mut x0 = original.x0;
    let mut y0 = original.y0;
    let mut x1 = original.x1;
    let mut y1 = original.y1;

    if handle.moves_left() {
        x0 = pointer.x.min(x1 - MIN_RESIZE_SIZE);
    }
    if handle.moves_right() {
        x1 = pointer.x.max(x0 + MIN_RESIZE_SIZE);
    }
    if handle.moves_top() {
        y0 = pointer.y.min(y1 - MIN_RESIZE_SIZE);
    }
    if handle.moves_bottom() {
        y1 = pointer.y.max(y0 + MIN_RESIZE_SIZE);
    }

    if preserve_aspect && handle.is_corner() && original.height() > 0.0 {
        let ratio = original.width() / original.height();
        let width = x1 - x0;
        let height = (width / ratio).max(MIN_RESIZE_SIZE);
        if handle.moves_top() {
            y0 = y1 - height;
        } else {
            y1 = y0 + height;
        }
    }

    Rect::new(x0, y0, x1, y1)
}
