//! RGBA color with hex parsing

use rand::Rng;

/// Linear RGBA color, each channel in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
    Color { r, g, b, a }
}

impl Color {
    pub const BLACK: Color = rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = rgba(1.0, 1.0, 1.0, 1.0);

    /// Parse `rrggbb` or `rrggbbaa`, with an optional leading `#`.
    pub fn from_hex(s: &str) -> Option<Color> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if !(s.len() == 6 || s.len() == 8) || !s.is_ascii() {
            return None;
        }

        let channel = |i: usize| -> Option<f32> {
            u8::from_str_radix(&s[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };

        let alpha = if s.len() == 8 { channel(6)? } else { 1.0 };
        Some(rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// Random fully opaque color
    pub fn random_opaque<R: Rng + ?Sized>(rng: &mut R) -> Color {
        rgba(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>(), 1.0)
    }

    pub fn with_alpha(self, a: f32) -> Color {
        rgba(self.r, self.g, self.b, a)
    }

    /// Scale RGB toward black (factor 0.0 = black, 1.0 = unchanged)
    pub fn darker(self, factor: f32) -> Color {
        rgba(self.r * factor, self.g * factor, self.b * factor, self.a)
    }
}

impl From<Color> for macroquad::color::Color {
    fn from(c: Color) -> Self {
        macroquad::color::Color::new(c.r, c.g, c.b, c.a)
    }
}
