//! Parallax background
//!
//! A solid fill plus three layers of darker rectangles. The world is cut into
//! square chunks and every chunk's rectangles come from an RNG seeded with
//! the chunk coordinates, so nothing has to be stored and the same chunk
//! always looks the same.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::camera::Camera;
use crate::math::{vec2, Color, Rect, Vec2};
use crate::system::LineStream;
use super::error::LevelError;
use super::section::{expect_line, Fields};

const SECTION: &str = "background";

pub const BACKGROUND_CHUNK_SIZE: f32 = 500.0;
const BACKGROUND_LAYERS: usize = 3;
const RECTS_PER_CHUNK: usize = 3;
const RECT_MIN_SIZE: f32 = 40.0;
const RECT_MAX_SIZE: f32 = 160.0;

pub struct Background {
    color: Color,
    debug_mode: bool,
}

impl Background {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            debug_mode: false,
        }
    }

    /// A single `color` line
    pub fn from_stream(stream: &mut LineStream) -> Result<Self, LevelError> {
        let line = expect_line(stream, SECTION)?;
        let color = Fields::new(line, SECTION).next_color("color")?;
        Ok(Self::new(color))
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn toggle_debug_mode(&mut self) {
        self.debug_mode = !self.debug_mode;
    }

    pub fn render(&self, camera: &mut Camera) -> Result<(), LevelError> {
        camera.fill_screen(self.color);

        for layer in 0..BACKGROUND_LAYERS {
            // Far layers follow the camera more, so they seem to move slower.
            let parallax = 1.0 - (layer + 1) as f32 / (BACKGROUND_LAYERS + 1) as f32;
            let shift = camera.position() * (1.0 - parallax);
            let color = self.color.darker(0.8 - 0.15 * layer as f32);

            let view = camera.view_rect().translate(-shift);
            let first = chunk_of(view.position());
            let last = chunk_of(vec2(view.right(), view.bottom()));

            for cy in first.1..=last.1 {
                for cx in first.0..=last.0 {
                    for rect in chunk_rects(cx, cy, layer) {
                        camera.fill_rect(rect.translate(shift), color);
                    }
                    if self.debug_mode {
                        let chunk = Rect::new(
                            cx as f32 * BACKGROUND_CHUNK_SIZE,
                            cy as f32 * BACKGROUND_CHUNK_SIZE,
                            BACKGROUND_CHUNK_SIZE,
                            BACKGROUND_CHUNK_SIZE,
                        );
                        camera.draw_rect(chunk.translate(shift), 1.0, color);
                    }
                }
            }
        }
        Ok(())
    }
}

fn chunk_of(p: Vec2) -> (i64, i64) {
    (
        (p.x / BACKGROUND_CHUNK_SIZE).floor() as i64,
        (p.y / BACKGROUND_CHUNK_SIZE).floor() as i64,
    )
}

fn chunk_seed(cx: i64, cy: i64, layer: usize) -> u64 {
    (cx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (cy as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        ^ (layer as u64).wrapping_mul(0x1656_67B1_9E37_79F9)
}

/// Layer-space rectangles of one chunk
fn chunk_rects(cx: i64, cy: i64, layer: usize) -> Vec<Rect> {
    let mut rng = StdRng::seed_from_u64(chunk_seed(cx, cy, layer));
    let origin = vec2(cx as f32, cy as f32) * BACKGROUND_CHUNK_SIZE;
    (0..RECTS_PER_CHUNK)
        .map(|_| {
            let w = rng.gen_range(RECT_MIN_SIZE..RECT_MAX_SIZE);
            let h = rng.gen_range(RECT_MIN_SIZE..RECT_MAX_SIZE);
            let x = rng.gen_range(0.0..BACKGROUND_CHUNK_SIZE - w);
            let y = rng.gen_range(0.0..BACKGROUND_CHUNK_SIZE - h);
            Rect::new(origin.x + x, origin.y + y, w, h)
        })
        .collect()
}
