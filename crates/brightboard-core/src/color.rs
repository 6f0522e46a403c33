//! Serializable color representation shared by strokes and the renderer.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable stroke color (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// The blue used for AI-generated hint text.
    pub fn ai_blue() -> Self {
        Self::new(37, 99, 235, 255)
    }

    /// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` hex string. Falls back to
    /// black on anything unrecognized, matching how the board treats an
    /// unknown user color.
    pub fn from_hex(color: &str) -> Self {
        let Some(hex) = color.strip_prefix('#') else {
            return Self::black();
        };
        let hex = hex.trim();
        if !hex.is_ascii() {
            return Self::black();
        }
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).unwrap_or(0) * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).unwrap_or(0) * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).unwrap_or(0) * 17;
                Self::new(r, g, b, 255)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                Self::new(r, g, b, 255)
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                let a = u8::from_str_radix(&hex[6..8], 16).unwrap_or(255);
                Self::new(r, g, b, a)
            }
            _ => Self::black(),
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgba::from_hex("#000000"), Rgba::black());
        assert_eq!(Rgba::from_hex("#fff"), Rgba::white());
        assert_eq!(Rgba::from_hex("#2563EB"), Rgba::ai_blue());
        assert_eq!(Rgba::from_hex("#2563EB80").a, 128);
    }

    #[test]
    fn test_unknown_color_defaults_to_black() {
        assert_eq!(Rgba::from_hex("blue"), Rgba::black());
        assert_eq!(Rgba::from_hex("#12345"), Rgba::black());
    }

    #[test]
    fn test_peniko_round_trip() {
        let color = Rgba::new(10, 20, 30, 200);
        let back: Rgba = Color::from(color).into();
        assert_eq!(color, back);
    }
}
