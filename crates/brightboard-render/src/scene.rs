//! Display-list scene builder.
//!
//! Turns the stroke list into backend-neutral draw commands in paint
//! order. A 2D canvas host replays the commands directly; the software
//! rasterizer consumes the same list for board snapshots.

use crate::renderer::{RenderContext, Renderer};
use brightboard_core::hittest::ResizeHandle;
use brightboard_core::stroke::{Stroke, StrokeGeometry, StrokeId};
use kurbo::{Point, Rect};
use peniko::Color;

/// Side length of a selection resize handle square.
pub const HANDLE_SIZE: f64 = 8.0;

/// One drawing command. Polylines are stroked with round caps and joins.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear {
        color: Color,
    },
    Polyline {
        points: Vec<Point>,
        color: Color,
        width: f64,
        /// Destination-out compositing: the line removes pixels instead
        /// of adding them (eraser strokes).
        erase: bool,
    },
    RectOutline {
        rect: Rect,
        color: Color,
        width: f64,
    },
    CircleOutline {
        center: Point,
        radius: f64,
        color: Color,
        width: f64,
    },
    TextRun {
        anchor: Point,
        text: String,
        font_size: f64,
        color: Color,
    },
    /// Bitmap draw; the bitmap itself lives in the image cache, keyed by
    /// stroke id.
    Bitmap {
        id: StrokeId,
        rect: Rect,
    },
    DashedOutline {
        rect: Rect,
        color: Color,
    },
    HandleSquare {
        center: Point,
        color: Color,
    },
}

/// An ordered frame's worth of draw commands.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub cmds: Vec<DrawCmd>,
}

impl Scene {
    pub fn clear(&mut self) {
        self.cmds.clear();
    }
}

/// Builds a [`Scene`] per frame from the render context.
#[derive(Debug, Default)]
pub struct DisplayListRenderer {
    scene: Scene,
}

impl DisplayListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn push_stroke(&mut self, stroke: &Stroke) {
        // A malformed stroke is skipped; it must not blank the frame
        if stroke.is_degenerate() {
            return;
        }
        match stroke {
            // Hints render in a separate math/markdown overlay
            Stroke::AiText(_) => {}
            Stroke::Pen(pen) => self.scene.cmds.push(DrawCmd::Polyline {
                points: pen.points.clone(),
                color: pen.color.into(),
                width: pen.width,
                erase: false,
            }),
            Stroke::Eraser(eraser) => self.scene.cmds.push(DrawCmd::Polyline {
                points: eraser.points.clone(),
                color: Color::WHITE,
                width: eraser.painted_width(),
                erase: true,
            }),
            Stroke::Rect(rect) => self.scene.cmds.push(DrawCmd::RectOutline {
                rect: rect.as_box(),
                color: rect.color.into(),
                width: rect.width,
            }),
            Stroke::Circle(circle) => self.scene.cmds.push(DrawCmd::CircleOutline {
                center: circle.center(),
                radius: circle.radius(),
                color: circle.color.into(),
                width: circle.width,
            }),
            Stroke::Text(text) => self.scene.cmds.push(DrawCmd::TextRun {
                anchor: text.anchor,
                text: text.text.clone(),
                font_size: text.font_size(),
                color: text.color.into(),
            }),
            Stroke::Image(image) => self.scene.cmds.push(DrawCmd::Bitmap {
                id: image.id(),
                rect: image.as_rect(),
            }),
        }
    }

    fn push_selection(&mut self, stroke: &Stroke, color: Color) {
        let bounds = stroke.bounds();
        self.scene.cmds.push(DrawCmd::DashedOutline {
            rect: bounds,
            color,
        });
        if stroke.is_image() {
            for handle in ResizeHandle::ALL {
                self.scene.cmds.push(DrawCmd::HandleSquare {
                    center: handle.position(bounds),
                    color,
                });
            }
        }
    }
}

impl Renderer for DisplayListRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.clear();
        self.scene.cmds.push(DrawCmd::Clear {
            color: ctx.background_color,
        });
        for stroke in ctx.strokes {
            self.push_stroke(stroke);
        }
        if let Some(selected) = ctx.selected {
            if let Some(stroke) = ctx.strokes.iter().find(|s| s.id() == selected) {
                self.push_selection(stroke, ctx.selection_color);
            }
        }
        if let Some(preview) = ctx.preview {
            self.push_stroke(preview);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brightboard_core::color::Rgba;
    use brightboard_core::stroke::{AiText, Circle, Eraser, Image, ImageFormat, Pen};
    use kurbo::Size;
    use uuid::Uuid;

    fn build(strokes: &[Stroke]) -> Scene {
        let mut renderer = DisplayListRenderer::new();
        let ctx = RenderContext::new(strokes, Size::new(800.0, 600.0));
        renderer.build_scene(&ctx);
        renderer.scene().clone()
    }

    #[test]
    fn test_empty_list_clears_only() {
        let scene = build(&[]);
        assert_eq!(scene.cmds.len(), 1);
        assert!(matches!(scene.cmds[0], DrawCmd::Clear { .. }));
    }

    #[test]
    fn test_ai_text_skipped() {
        let strokes = vec![Stroke::AiText(AiText::new(
            Point::ZERO,
            "hint".into(),
            Uuid::new_v4(),
        ))];
        let scene = build(&strokes);
        assert_eq!(scene.cmds.len(), 1);
    }

    #[test]
    fn test_eraser_paints_wide_and_erasing() {
        let strokes = vec![Stroke::Eraser(Eraser::from_points(
            vec![Point::ZERO, Point::new(10.0, 0.0)],
            Rgba::black(),
            4.0,
        ))];
        let scene = build(&strokes);
        let DrawCmd::Polyline { width, erase, .. } = &scene.cmds[1] else {
            panic!("expected polyline");
        };
        assert_eq!(*width, 16.0);
        assert!(erase);
    }

    #[test]
    fn test_degenerate_stroke_skipped() {
        let strokes = vec![
            Stroke::Pen(Pen::from_points(Vec::new(), Rgba::black(), 4.0)),
            Stroke::Pen(Pen::from_points(
                vec![Point::ZERO, Point::new(5.0, 5.0)],
                Rgba::black(),
                4.0,
            )),
        ];
        let scene = build(&strokes);
        // clear + one valid polyline
        assert_eq!(scene.cmds.len(), 2);
    }

    #[test]
    fn test_circle_command_geometry() {
        let strokes = vec![Stroke::Circle(Circle::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Rgba::black(),
            2.0,
        ))];
        let scene = build(&strokes);
        let DrawCmd::CircleOutline { center, radius, .. } = &scene.cmds[1] else {
            panic!("expected circle");
        };
        assert_eq!(*center, Point::new(5.0, 0.0));
        assert_eq!(*radius, 5.0);
    }

    #[test]
    fn test_selected_image_gets_outline_and_handles() {
        let image = Image::new(Point::ZERO, &[0], 100, 80, ImageFormat::Png);
        let id = image.id();
        let strokes = vec![Stroke::Image(image)];
        let mut renderer = DisplayListRenderer::new();
        let ctx = RenderContext::new(&strokes, Size::new(800.0, 600.0)).with_selected(Some(id));
        renderer.build_scene(&ctx);
        let cmds = &renderer.scene().cmds;
        let handles = cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::HandleSquare { .. }))
            .count();
        assert_eq!(handles, 8);
        assert!(cmds.iter().any(|c| matches!(c, DrawCmd::DashedOutline { .. })));
    }

    #[test]
    fn test_preview_painted_last() {
        let committed = Stroke::Pen(Pen::from_points(
            vec![Point::ZERO, Point::new(5.0, 5.0)],
            Rgba::black(),
            4.0,
        ));
        let preview = Stroke::Pen(Pen::from_points(
            vec![Point::new(20.0, 20.0), Point::new(30.0, 30.0)],
            Rgba::black(),
            4.0,
        ));
        let strokes = vec![committed];
        let mut renderer = DisplayListRenderer::new();
        let ctx = RenderContext::new(&strokes, Size::new(800.0, 600.0)).with_preview(Some(&preview));
        renderer.build_scene(&ctx);
        assert_eq!(renderer.scene().cmds.len(), 3);
        assert!(matches!(
            renderer.scene().cmds.last(),
            Some(DrawCmd::Polyline { .. })
        ));
    }
}
