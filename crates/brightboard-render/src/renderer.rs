//! Renderer trait abstraction.

use brightboard_core::stroke::{Stroke, StrokeId};
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Image decode failed: {0}")]
    ImageDecode(String),
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame. The whole stroke list is redrawn
/// from scratch every frame; there is no incremental diffing.
pub struct RenderContext<'a> {
    /// Strokes in paint order (back to front).
    pub strokes: &'a [Stroke],
    /// Viewport size in canvas units.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Move-tool selection, drawn with a dashed outline (and resize
    /// handles for images).
    pub selected: Option<StrokeId>,
    /// In-progress gesture preview, painted above everything.
    pub preview: Option<&'a Stroke>,
}

impl<'a> RenderContext<'a> {
    pub fn new(strokes: &'a [Stroke], viewport_size: Size) -> Self {
        Self {
            strokes,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::WHITE,
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            selected: None,
            preview: None,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the selected stroke.
    pub fn with_selected(mut self, selected: Option<StrokeId>) -> Self {
        self.selected = selected;
        self
    }

    /// Set the gesture preview stroke.
    pub fn with_preview(mut self, preview: Option<&'a Stroke>) -> Self {
        self.preview = preview;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the command buffer for a frame. Called once per frame;
    /// must tolerate an empty stroke list (clears to background).
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
