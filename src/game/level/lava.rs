//! Lava pools
//!
//! Deadly for the player, buoyant for boxes. The surface is drawn as a row
//! of strips whose top edge follows a traveling sine wave.

use crate::game::camera::Camera;
use crate::math::{vec2, Color, Rect, Vec2};
use crate::system::LineStream;
use super::error::LevelError;
use super::rigid_bodies::{RigidBodies, RigidBodyId};
use super::section::{expect_line, read_count, Fields};

const SECTION: &str = "lava";

/// Upward force per unit of body height at full submersion
pub const LAVA_BOINGNESS: f32 = 2500.0;
/// Entrywise velocity damping applied to bodies in lava every frame
pub const LAVA_DAMPER: Vec2 = vec2(0.9, 0.9);

const WAVE_STRIP_WIDTH: f32 = 10.0;
const WAVE_AMPLITUDE: f32 = 4.0;
const WAVE_LENGTH: f32 = 80.0;
const WAVE_SPEED: f32 = 3.0;

struct WavyRect {
    rect: Rect,
    color: Color,
}

pub struct Lava {
    rects: Vec<WavyRect>,
    angle: f32,
}

impl Lava {
    /// `count`, then `count` lines of `x y w h color`
    pub fn from_stream(stream: &mut LineStream) -> Result<Self, LevelError> {
        let count = read_count(stream, SECTION)?;
        let mut rects = Vec::with_capacity(count);
        for _ in 0..count {
            let line = expect_line(stream, SECTION)?;
            let mut fields = Fields::new(line, SECTION);
            let rect = fields.next_rect()?;
            let color = fields.next_color("color")?;
            rects.push(WavyRect { rect, color });
        }
        Ok(Self { rects, angle: 0.0 })
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn overlaps_rect(&self, rect: &Rect) -> bool {
        self.rects.iter().any(|w| w.rect.overlaps(rect))
    }

    /// Push a body up in proportion to how much of it is submerged, and
    /// damp its velocity.
    pub fn float_rigid_body(
        &self,
        pool: &mut RigidBodies,
        id: RigidBodyId,
    ) -> Result<(), LevelError> {
        let hitbox = pool.hitbox(id)?;
        let body_area = hitbox.w * hitbox.h;
        if body_area <= 0.0 {
            return Ok(());
        }

        for wavy in &self.rects {
            if let Some(overlap) = hitbox.overlap_area(&wavy.rect) {
                let k = overlap.w * overlap.h / body_area;
                pool.apply_force(id, vec2(0.0, -hitbox.h * k * LAVA_BOINGNESS))?;
                pool.transform_velocity(id, LAVA_DAMPER)?;
            }
        }
        Ok(())
    }

    pub fn update(&mut self, delta_time: f32) {
        self.angle = (self.angle + WAVE_SPEED * delta_time) % (2.0 * std::f32::consts::PI);
    }

    pub fn render(&self, camera: &mut Camera) -> Result<(), LevelError> {
        for wavy in &self.rects {
            if !camera.is_rect_visible(wavy.rect) {
                continue;
            }

            let rect = wavy.rect;
            let mut x = rect.x;
            while x < rect.right() {
                let w = WAVE_STRIP_WIDTH.min(rect.right() - x);
                let phase = self.angle + (x - rect.x) / WAVE_LENGTH * 2.0 * std::f32::consts::PI;
                let offset = (phase.sin() + 1.0) * 0.5 * WAVE_AMPLITUDE;
                let h = (rect.h - offset).max(0.0);
                camera.fill_rect(Rect::new(x, rect.y + offset, w, h), wavy.color);
                x += WAVE_STRIP_WIDTH;
            }
        }
        Ok(())
    }
}
