//! Tool system: interprets pointer-down/move/up according to the active
//! tool and produces new strokes or mutates existing ones.

use crate::color::Rgba;
use crate::geometry::constrain_straight;
use crate::hittest::{
    drag_offset, find_stroke_at, handle_at, movement_delta, new_origin, resize_box, ResizeHandle,
};
use crate::input::PointerInput;
use crate::store::StrokeStore;
use crate::stroke::{
    Circle, Eraser, Pen, Rect as RectStroke, Stroke, StrokeId, Text, ToolKind,
};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Style applied to strokes created by the drawing tools.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToolStyle {
    pub color: Rgba,
    pub width: f64,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            color: Rgba::black(),
            width: 4.0,
        }
    }
}

/// Transient move-tool state between pointer-down and pointer-up.
#[derive(Debug, Clone)]
pub enum MoveState {
    /// Dragging a stroke body. `offset` is pointer minus origin at grab.
    Dragging {
        id: StrokeId,
        offset: kurbo::Vec2,
    },
    /// Dragging an image resize handle.
    Resizing {
        id: StrokeId,
        handle: ResizeHandle,
        original: Rect,
    },
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    #[default]
    Idle,
    /// A drawing tool is between pointer-down and pointer-up.
    Drawing {
        start: Point,
        current: Point,
        points: Vec<Point>,
    },
    /// The move tool has grabbed something.
    Moving(MoveState),
}

/// Side request from `begin` that the host must fulfil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEffect {
    None,
    /// The text tool wants a string; commit it via
    /// [`ToolManager::make_text`] at the given anchor if non-empty.
    PromptText(Point),
}

/// Manages the current tool and its in-progress gesture.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    pub current_tool: ToolKind,
    pub state: ToolState,
    pub style: ToolStyle,
    /// Move-tool selection, shown with a dashed outline.
    pub selected: Option<StrokeId>,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch tools, abandoning any in-progress gesture and selection.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = ToolState::Idle;
        self.selected = None;
    }

    /// Begin a gesture at the pointer-down position.
    pub fn begin(&mut self, store: &StrokeStore, input: PointerInput) -> GestureEffect {
        let p = input.position;
        match self.current_tool {
            ToolKind::Pen | ToolKind::Eraser | ToolKind::Rectangle | ToolKind::Circle => {
                self.state = ToolState::Drawing {
                    start: p,
                    current: p,
                    points: vec![p],
                };
                GestureEffect::None
            }
            ToolKind::Text => GestureEffect::PromptText(p),
            ToolKind::Move => {
                self.begin_move(store, p);
                GestureEffect::None
            }
            // Image insertion comes from paste or an explicit action, and
            // ai-text strokes from the assistance flow; neither is a
            // canvas drag tool.
            ToolKind::Image | ToolKind::AiText => GestureEffect::None,
        }
    }

    fn begin_move(&mut self, store: &StrokeStore, p: Point) {
        if let Some(id) = self.selected {
            if let Some(image) = store.get(id).and_then(|s| s.as_image()) {
                if let Some(handle) = handle_at(image, p) {
                    self.state = ToolState::Moving(MoveState::Resizing {
                        id,
                        handle,
                        original: image.as_rect(),
                    });
                    return;
                }
            }
        }
        match find_stroke_at(store.strokes(), p) {
            Some(stroke) => {
                let id = stroke.id();
                let offset = drag_offset(p, stroke.origin());
                self.selected = Some(id);
                self.state = ToolState::Moving(MoveState::Dragging { id, offset });
            }
            None => {
                self.selected = None;
                self.state = ToolState::Idle;
            }
        }
    }

    /// Advance the gesture to a new pointer position. Move-tool gestures
    /// mutate the store in place (continuous, not undo-tracked).
    pub fn update(&mut self, store: &mut StrokeStore, input: PointerInput) {
        let p = input.position;
        match &mut self.state {
            ToolState::Idle => {}
            ToolState::Drawing {
                start,
                current,
                points,
            } => {
                *current = p;
                match self.current_tool {
                    ToolKind::Pen if input.modifiers.shift => {
                        *points = constrain_straight(*start, p);
                    }
                    ToolKind::Pen | ToolKind::Eraser => points.push(p),
                    // Shapes only care about start and current
                    _ => {}
                }
            }
            ToolState::Moving(MoveState::Dragging { id, offset }) => {
                let (id, offset) = (*id, *offset);
                if let Some(old_origin) = store.get(id).map(|s| s.origin()) {
                    let delta = movement_delta(old_origin, new_origin(p, offset));
                    store.update(id, |s| s.translate(delta));
                }
            }
            ToolState::Moving(MoveState::Resizing {
                id,
                handle,
                original,
            }) => {
                let (id, handle, original) = (*id, *handle, *original);
                let new_box = resize_box(handle, original, p, input.modifiers.shift);
                store.update(id, |s| {
                    if let Stroke::Image(image) = s {
                        image.position = new_box.origin();
                        image.width = new_box.width();
                        image.height = new_box.height();
                    }
                });
            }
        }
    }

    /// End the gesture and return the stroke to commit, if any. The move
    /// tool never produces a stroke; its mutations already happened.
    pub fn end(&mut self, input: PointerInput) -> Option<Stroke> {
        let state = std::mem::take(&mut self.state);
        let ToolState::Drawing {
            start,
            current: _,
            mut points,
        } = state
        else {
            return None;
        };
        let p = input.position;
        let style = self.style;
        match self.current_tool {
            ToolKind::Pen => {
                if input.modifiers.shift {
                    points = constrain_straight(start, p);
                }
                if points.is_empty() {
                    return None;
                }
                Some(Stroke::Pen(Pen::from_points(points, style.color, style.width)))
            }
            ToolKind::Eraser => {
                if points.is_empty() {
                    return None;
                }
                Some(Stroke::Eraser(Eraser::from_points(
                    points,
                    style.color,
                    style.width,
                )))
            }
            ToolKind::Rectangle => Some(Stroke::Rect(RectStroke::new(
                start,
                p,
                style.color,
                style.width,
            ))),
            ToolKind::Circle => Some(Stroke::Circle(Circle::new(
                start,
                p,
                style.color,
                style.width,
            ))),
            _ => None,
        }
    }

    /// Build the committed text stroke for a fulfilled prompt. Empty or
    /// whitespace-only input aborts cleanly.
    pub fn make_text(&self, anchor: Point, text: &str) -> Option<Stroke> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Stroke::Text(Text::new(
            anchor,
            trimmed.to_string(),
            self.style.color,
            self.style.width,
        )))
    }

    /// Cancel the current gesture without committing anything.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    /// Transient stroke to paint over the scene while a drawing gesture
    /// is in progress.
    pub fn preview(&self) -> Option<Stroke> {
        let ToolState::Drawing {
            start,
            current,
            points,
        } = &self.state
        else {
            return None;
        };
        let style = self.style;
        match self.current_tool {
            ToolKind::Pen => Some(Stroke::Pen(Pen::from_points(
                points.clone(),
                style.color,
                style.width,
            ))),
            ToolKind::Eraser => Some(Stroke::Eraser(Eraser::from_points(
                points.clone(),
                style.color,
                style.width,
            ))),
            ToolKind::Rectangle => Some(Stroke::Rect(RectStroke::new(
                *start,
                *current,
                style.color,
                style.width,
            ))),
            ToolKind::Circle => Some(Stroke::Circle(Circle::new(
                *start,
                *current,
                style.color,
                style.width,
            ))),
            _ => None,
        }
    }
}
