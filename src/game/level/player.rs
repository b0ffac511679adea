//! Player
//!
//! A single rigid body in the shared pool, driven by input. Dying disables
//! the body for a short explosion animation, after which the player comes
//! back at the last checkpoint.

use crate::game::camera::Camera;
use crate::game::sound::{SoundCue, SoundSink};
use crate::math::{vec2, Color, Rect, Vec2};
use crate::system::LineStream;
use super::error::LevelError;
use super::lava::Lava;
use super::rigid_bodies::{RigidBodies, RigidBodyId};
use super::section::{expect_line, Fields};

const SECTION: &str = "player";

pub const PLAYER_WIDTH: f32 = 25.0;
pub const PLAYER_HEIGHT: f32 = 25.0;
pub const PLAYER_SPEED: f32 = 500.0;
pub const PLAYER_JUMP_SPEED: f32 = 900.0;
/// How long after leaving the ground a jump is still accepted
pub const PLAYER_JUMP_GRACE: f32 = 0.1;
pub const PLAYER_DEATH_DURATION: f32 = 0.5;

/// Growth of the death square over the whole animation
const DEATH_EXPANSION: f32 = 4.0;

/// The `x y color` line of the player section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerRecord {
    pub position: Vec2,
    pub color: Color,
}

impl PlayerRecord {
    pub fn parse(stream: &mut LineStream) -> Result<Self, LevelError> {
        let line = expect_line(stream, SECTION)?;
        let mut fields = Fields::new(line, SECTION);
        let x = fields.next_f32("x")?;
        let y = fields.next_f32("y")?;
        let color = fields.next_color("color")?;
        Ok(Self {
            position: vec2(x, y),
            color,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerState {
    Alive,
    Dying { timer: f32 },
}

pub struct Player {
    body_id: RigidBodyId,
    color: Color,
    state: PlayerState,
    checkpoint: Vec2,
    /// Seconds since the body last stood on something
    airborne_time: f32,
    /// Cues raised since the last `sound` call
    cues: Vec<SoundCue>,
}

impl Player {
    pub fn from_stream(stream: &mut LineStream, rigid_bodies: &mut RigidBodies) -> Result<Self, LevelError> {
        let record = PlayerRecord::parse(stream)?;
        Self::from_record(record, rigid_bodies)
    }

    pub fn from_record(record: PlayerRecord, rigid_bodies: &mut RigidBodies) -> Result<Self, LevelError> {
        let hitbox = Rect::from_vecs(record.position, vec2(PLAYER_WIDTH, PLAYER_HEIGHT));
        let body_id = rigid_bodies.add(hitbox, record.color)?;
        Ok(Self {
            body_id,
            color: record.color,
            state: PlayerState::Alive,
            checkpoint: record.position,
            airborne_time: f32::INFINITY,
            cues: Vec::new(),
        })
    }

    pub fn body_id(&self) -> RigidBodyId {
        self.body_id
    }

    pub fn is_alive(&self) -> bool {
        self.state == PlayerState::Alive
    }

    pub fn hitbox(&self, rigid_bodies: &RigidBodies) -> Result<Rect, LevelError> {
        rigid_bodies.hitbox(self.body_id)
    }

    pub fn move_left(&self, rigid_bodies: &mut RigidBodies) -> Result<(), LevelError> {
        rigid_bodies.set_movement(self.body_id, vec2(-PLAYER_SPEED, 0.0))
    }

    pub fn move_right(&self, rigid_bodies: &mut RigidBodies) -> Result<(), LevelError> {
        rigid_bodies.set_movement(self.body_id, vec2(PLAYER_SPEED, 0.0))
    }

    pub fn stop(&self, rigid_bodies: &mut RigidBodies) -> Result<(), LevelError> {
        rigid_bodies.set_movement(self.body_id, Vec2::ZERO)
    }

    pub fn jump(&mut self, rigid_bodies: &mut RigidBodies) -> Result<(), LevelError> {
        if !self.is_alive() || self.airborne_time > PLAYER_JUMP_GRACE {
            return Ok(());
        }

        let velocity = rigid_bodies.velocity(self.body_id)?;
        rigid_bodies.set_velocity(self.body_id, vec2(velocity.x, -PLAYER_JUMP_SPEED))?;
        self.airborne_time = f32::INFINITY;
        self.cues.push(SoundCue::Jump);
        Ok(())
    }

    pub fn update(&mut self, rigid_bodies: &mut RigidBodies, delta_time: f32) -> Result<(), LevelError> {
        match self.state {
            PlayerState::Alive => {
                rigid_bodies.update(self.body_id, delta_time)?;

                // The grounded flag is from the last collision pass; a body
                // already heading up has left the ground since.
                let standing = rigid_bodies.is_grounded(self.body_id)?
                    && rigid_bodies.velocity(self.body_id)?.y >= 0.0;
                if standing {
                    self.airborne_time = 0.0;
                } else {
                    self.airborne_time += delta_time;
                }
            }
            PlayerState::Dying { timer } => {
                let timer = timer - delta_time;
                if timer > 0.0 {
                    self.state = PlayerState::Dying { timer };
                } else {
                    self.resurrect(rigid_bodies)?;
                }
            }
        }
        Ok(())
    }

    fn resurrect(&mut self, rigid_bodies: &mut RigidBodies) -> Result<(), LevelError> {
        tracing::debug!(x = self.checkpoint.x, y = self.checkpoint.y, "player resurrected");
        rigid_bodies.teleport_to(self.body_id, self.checkpoint)?;
        rigid_bodies.set_velocity(self.body_id, Vec2::ZERO)?;
        rigid_bodies.disable(self.body_id, false)?;
        self.state = PlayerState::Alive;
        self.airborne_time = f32::INFINITY;
        Ok(())
    }

    pub fn die(&mut self, rigid_bodies: &mut RigidBodies) -> Result<(), LevelError> {
        if !self.is_alive() {
            return Ok(());
        }
        rigid_bodies.disable(self.body_id, true)?;
        self.state = PlayerState::Dying {
            timer: PLAYER_DEATH_DURATION,
        };
        self.cues.push(SoundCue::Death);
        Ok(())
    }

    pub fn die_from_lava(&mut self, lava: &Lava, rigid_bodies: &mut RigidBodies) -> Result<(), LevelError> {
        if self.is_alive() && lava.overlaps_rect(&self.hitbox(rigid_bodies)?) {
            self.die(rigid_bodies)?;
        }
        Ok(())
    }

    /// Where the next resurrection happens
    pub fn checkpoint(&mut self, point: Vec2) {
        self.checkpoint = point;
    }

    pub fn checkpoint_position(&self) -> Vec2 {
        self.checkpoint
    }

    pub fn focus_camera(&self, rigid_bodies: &RigidBodies, camera: &mut Camera) -> Result<(), LevelError> {
        camera.center_at(self.hitbox(rigid_bodies)?.center());
        Ok(())
    }

    pub fn render(&self, rigid_bodies: &RigidBodies, camera: &mut Camera) -> Result<(), LevelError> {
        match self.state {
            PlayerState::Alive => rigid_bodies.render(self.body_id, camera),
            PlayerState::Dying { timer } => {
                let t = 1.0 - timer / PLAYER_DEATH_DURATION;
                let center = self.hitbox(rigid_bodies)?.center();
                let size = vec2(PLAYER_WIDTH, PLAYER_HEIGHT) * (1.0 + DEATH_EXPANSION * t);
                let rect = Rect::from_vecs(center - size * 0.5, size);
                camera.fill_rect(rect, self.color.with_alpha((1.0 - t).max(0.0)));
                Ok(())
            }
        }
    }

    pub fn sound(&mut self, sink: &mut dyn SoundSink) {
        for cue in self.cues.drain(..) {
            sink.play(cue);
        }
    }
}
