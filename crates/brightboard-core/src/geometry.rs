//! Pure geometry helpers shared by the tool gestures, hit tests, and
//! renderer. None of these touch stroke state.

use crate::stroke::GLYPH_ADVANCE_RATIO;
use kurbo::{Point, Rect};

/// Translate window-space pointer coordinates into canvas space given the
/// canvas's top-left corner in the same window space. Mouse and touch
/// events normalize through here so every downstream consumer sees one
/// coordinate system.
pub fn cursor_position(client: Point, canvas_origin: Point) -> Point {
    Point::new(client.x - canvas_origin.x, client.y - canvas_origin.y)
}

/// Corner-to-corner rectangle, normalized so min <= max on both axes.
pub fn rect_from_corners(a: Point, b: Point) -> Rect {
    Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
}

/// A circle's center is the midpoint of the two gesture points, its
/// radius half the distance between them.
pub fn circle_from_points(a: Point, b: Point) -> (Point, f64) {
    (a.midpoint(b), a.distance(b) / 2.0)
}

/// Collapse an in-progress pen path to a straight segment from the
/// gesture start to the current point. Used while the line constraint
/// modifier is held.
pub fn constrain_straight(start: Point, current: Point) -> Vec<Point> {
    vec![start, current]
}

/// Measured dimensions of a wrapped text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub lines: Vec<String>,
}

/// Greedy word wrap against an estimated per-glyph advance. A word wider
/// than `max_width` occupies its own overflowing line rather than being
/// split mid-word.
pub fn measure_text(text: &str, font_size: f64, max_width: f64) -> TextMetrics {
    let advance = font_size * GLYPH_ADVANCE_RATIO;
    let line_height = font_size * 1.3;
    let mut lines: Vec<String> = Vec::new();
    for raw_line in text.lines() {
        let mut line = String::new();
        let mut line_chars = 0usize;
        for word in raw_line.split_whitespace() {
            let word_chars = word.chars().count();
            let candidate = if line.is_empty() {
                word_chars
            } else {
                line_chars + 1 + word_chars
            };
            if !line.is_empty() && candidate as f64 * advance > max_width {
                lines.push(std::mem::take(&mut line));
                line_chars = 0;
            }
            if !line.is_empty() {
                line.push(' ');
                line_chars += 1;
            }
            line.push_str(word);
            line_chars += word_chars;
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    let widest = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    TextMetrics {
        width: widest as f64 * advance,
        height: lines.len() as f64 * line_height,
        lines,
    }
}
