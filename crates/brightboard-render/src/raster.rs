//! Software rasterizer for board snapshots.
//!
//! Produces the PNG data URL sent to the image-analysis collaborator.
//! The board is always composited onto opaque white, whatever the live
//! canvas background, so humans and the vision model see the same thing.

use crate::image_cache::ImageCache;
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use crate::scene::{DisplayListRenderer, DrawCmd};
use brightboard_core::stroke::Stroke;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{Rgba, RgbaImage};
use kurbo::{Point, Size};
use peniko::Color;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Render the stroke list into an opaque-white RGBA bitmap.
pub fn rasterize(strokes: &[Stroke], width: u32, height: u32, cache: &ImageCache) -> RgbaImage {
    let mut renderer = DisplayListRenderer::new();
    let ctx = RenderContext::new(strokes, Size::new(width as f64, height as f64))
        .with_background(Color::WHITE);
    renderer.build_scene(&ctx);

    let mut buf = RgbaImage::from_pixel(width, height, WHITE);
    for cmd in &renderer.scene().cmds {
        match cmd {
            DrawCmd::Clear { color } => {
                let px = opaque(*color);
                for p in buf.pixels_mut() {
                    *p = px;
                }
            }
            DrawCmd::Polyline {
                points,
                color,
                width,
                erase,
            } => {
                // Destination-out over opaque white paints white
                let px = if *erase { WHITE } else { opaque(*color) };
                draw_polyline(&mut buf, points, *width, px);
            }
            DrawCmd::RectOutline { rect, color, width } => {
                let px = opaque(*color);
                let corners = [
                    Point::new(rect.x0, rect.y0),
                    Point::new(rect.x1, rect.y0),
                    Point::new(rect.x1, rect.y1),
                    Point::new(rect.x0, rect.y1),
                    Point::new(rect.x0, rect.y0),
                ];
                draw_polyline(&mut buf, &corners, *width, px);
            }
            DrawCmd::CircleOutline {
                center,
                radius,
                color,
                width,
            } => {
                let px = opaque(*color);
                draw_circle(&mut buf, *center, *radius, *width, px);
            }
            DrawCmd::Bitmap { id, rect } => {
                if let Some(bitmap) = cache.get(*id) {
                    blit_scaled(&mut buf, bitmap, rect);
                }
            }
            // No font rasterizer in the snapshot path; text content still
            // reaches the tutor through the stroke summary
            DrawCmd::TextRun { .. } => {}
            // Selection chrome never belongs in an exported snapshot
            DrawCmd::DashedOutline { .. } | DrawCmd::HandleSquare { .. } => {}
        }
    }
    buf
}

/// Rasterize and encode as a `data:image/png;base64,` URL.
pub fn board_snapshot_data_url(
    strokes: &[Stroke],
    width: u32,
    height: u32,
    cache: &ImageCache,
) -> RenderResult<String> {
    let bitmap = rasterize(strokes, width, height, cache);
    png_data_url(&bitmap)
}

/// Encode a bitmap as a PNG data URL.
pub fn png_data_url(bitmap: &RgbaImage) -> RenderResult<String> {
    let mut bytes = Vec::new();
    bitmap
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .map_err(|e| RendererError::Encoding(e.to_string()))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
}

fn opaque(color: Color) -> Rgba<u8> {
    let c = color.to_rgba8();
    Rgba([c.r, c.g, c.b, 255])
}

fn put_disc(buf: &mut RgbaImage, center: Point, radius: f64, px: Rgba<u8>) {
    let r = radius.max(0.5);
    let x_min = (center.x - r).floor().max(0.0) as i64;
    let x_max = (center.x + r).ceil().min(buf.width() as f64 - 1.0) as i64;
    let y_min = (center.y - r).floor().max(0.0) as i64;
    let y_max = (center.y + r).ceil().min(buf.height() as f64 - 1.0) as i64;
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let d = Point::new(x as f64, y as f64).distance(center);
            if d <= r {
                buf.put_pixel(x as u32, y as u32, px);
            }
        }
    }
}

fn draw_polyline(buf: &mut RgbaImage, points: &[Point], width: f64, px: Rgba<u8>) {
    let radius = (width / 2.0).max(0.5);
    match points {
        [] => {}
        [single] => put_disc(buf, *single, radius, px),
        _ => {
            for pair in points.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let len = a.distance(b);
                let steps = (len / radius.min(1.0)).ceil().max(1.0) as usize;
                for i in 0..=steps {
                    let t = i as f64 / steps as f64;
                    put_disc(buf, a.lerp(b, t), radius, px);
                }
            }
        }
    }
}

fn draw_circle(buf: &mut RgbaImage, center: Point, radius: f64, width: f64, px: Rgba<u8>) {
    if radius <= 0.0 {
        return;
    }
    let steps = ((radius * std::f64::consts::TAU) as usize).max(16);
    let brush = (width / 2.0).max(0.5);
    for i in 0..=steps {
        let theta = i as f64 / steps as f64 * std::f64::consts::TAU;
        let p = Point::new(
            center.x + radius * theta.cos(),
            center.y + radius * theta.sin(),
        );
        put_disc(buf, p, brush, px);
    }
}

fn blit_scaled(buf: &mut RgbaImage, bitmap: &RgbaImage, rect: &kurbo::Rect) {
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return;
    }
    let x_min = rect.x0.floor().max(0.0) as u32;
    let y_min = rect.y0.floor().max(0.0) as u32;
    let x_max = (rect.x1.ceil().min(buf.width() as f64) as u32).max(x_min);
    let y_max = (rect.y1.ceil().min(buf.height() as f64) as u32).max(y_min);
    for y in y_min..y_max {
        for x in x_min..x_max {
            // Nearest-neighbor sample
            let u = ((x as f64 - rect.x0) / rect.width() * bitmap.width() as f64)
                .clamp(0.0, bitmap.width() as f64 - 1.0) as u32;
            let v = ((y as f64 - rect.y0) / rect.height() * bitmap.height() as f64)
                .clamp(0.0, bitmap.height() as f64 - 1.0) as u32;
            let src = *bitmap.get_pixel(u, v);
            // Composite over white so transparency cannot leak through
            let alpha = src.0[3] as f64 / 255.0;
            let blend = |s: u8, d: u8| (s as f64 * alpha + d as f64 * (1.0 - alpha)).round() as u8;
            let dst = *buf.get_pixel(x, y);
            buf.put_pixel(
                x,
                y,
                Rgba([
                    blend(src.0[0], dst.0[0]),
                    blend(src.0[1], dst.0[1]),
                    blend(src.0[2], dst.0[2]),
                    255,
                ]),
            );
        }
    }
}
