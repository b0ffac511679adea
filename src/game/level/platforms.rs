//! Static platforms
//!
//! Used twice per level: the foreground layer that bodies collide with, and
//! a purely decorative background layer.

use crate::game::camera::Camera;
use crate::math::{Color, Rect};
use crate::system::LineStream;
use super::error::LevelError;
use super::section::{expect_line, read_count, Fields};

const SECTION: &str = "platforms";

/// Default color for platforms built in code
const PLATFORM_COLOR: Color = crate::math::rgba(0.4, 0.4, 0.4, 1.0);

pub struct Platforms {
    rects: Vec<Rect>,
    colors: Vec<Color>,
}

impl Platforms {
    /// `count`, then `count` lines of `x y w h color`
    pub fn from_stream(stream: &mut LineStream) -> Result<Self, LevelError> {
        let count = read_count(stream, SECTION)?;
        let mut rects = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);

        for _ in 0..count {
            let line = expect_line(stream, SECTION)?;
            let mut fields = Fields::new(line, SECTION);
            rects.push(fields.next_rect()?);
            colors.push(fields.next_color("color")?);
        }

        Ok(Self { rects, colors })
    }

    pub fn from_rects(rects: Vec<Rect>) -> Self {
        let colors = vec![PLATFORM_COLOR; rects.len()];
        Self { rects, colors }
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn overlaps_rect(&self, rect: &Rect) -> bool {
        self.rects.iter().any(|r| r.overlaps(rect))
    }

    pub fn render(&self, camera: &mut Camera) -> Result<(), LevelError> {
        for (rect, color) in self.rects.iter().zip(&self.colors) {
            if camera.is_rect_visible(*rect) {
                camera.fill_rect(*rect, *color);
            }
        }
        Ok(())
    }
}
