//! Level
//!
//! Owns every section of a loaded level plus the rigid body pool they share,
//! and drives them through the frame in a fixed order:
//!
//! 1. boxes float in lava
//! 2. gravity is applied to every body
//! 3. boxes and the player integrate
//! 4. bodies are pushed out of the foreground platforms
//! 5. goals hide under the player, lava kills, regions fire
//! 6. animations advance
//!
//! The file is a plain sequence of sections with no headers; the order is
//! the schema: background, player, platforms, goals, lava, back platforms,
//! boxes, labels, regions.

mod background;
mod boxes;
mod error;
mod goals;
mod labels;
mod lava;
mod platforms;
mod player;
mod regions;
mod rigid_bodies;
mod section;

pub use background::*;
pub use boxes::*;
pub use error::*;
pub use goals::*;
pub use labels::*;
pub use lava::*;
pub use platforms::*;
pub use player::*;
pub use regions::*;
pub use rigid_bodies::*;

use std::path::{Path, PathBuf};

use macroquad::input::KeyCode;

use crate::game::camera::Camera;
use crate::game::sound::SoundSink;
use crate::input::{InputEvent, InputSnapshot};
use crate::math::{vec2, Vec2};
use crate::script::{Expr, LevelCommand, ScriptError, Value};
use crate::system::LineStream;

pub const LEVEL_LINE_MAX_LENGTH: usize = 512;
pub const RIGID_BODIES_CAPACITY: usize = 1024;
pub const LEVEL_GRAVITY: f32 = 1500.0;

/// Joystick button that jumps
const JUMP_BUTTON: u32 = 1;
const FLYING_ZOOM_STEP: f32 = 0.1;
const FLYING_MIN_SCALE: f32 = 0.1;

/// Everything after the player section. Parsed as one unit so that a
/// reload can swap it in only when all of it parsed.
struct Sections {
    platforms: Platforms,
    goals: Goals,
    lava: Lava,
    back_platforms: Platforms,
    boxes: Boxes,
    labels: Labels,
    regions: Regions,
}

impl Sections {
    fn from_stream(stream: &mut LineStream, rigid_bodies: &mut RigidBodies) -> Result<Self, LevelError> {
        let platforms = Platforms::from_stream(stream)?;
        let goals = Goals::from_stream(stream)?;
        let lava = Lava::from_stream(stream)?;
        let back_platforms = Platforms::from_stream(stream)?;
        let boxes = Boxes::from_stream(stream, rigid_bodies)?;

        // Boxes are already in the pool; take them out again if the rest fails.
        let tail = Labels::from_stream(stream)
            .and_then(|labels| Ok((labels, Regions::from_stream(stream)?)));
        let (labels, regions) = match tail {
            Ok(tail) => tail,
            Err(e) => {
                boxes.release(rigid_bodies);
                return Err(e);
            }
        };

        Ok(Self {
            platforms,
            goals,
            lava,
            back_platforms,
            boxes,
            labels,
            regions,
        })
    }
}

pub struct Level {
    file_name: PathBuf,
    background: Background,
    rigid_bodies: RigidBodies,
    player: Player,
    platforms: Platforms,
    goals: Goals,
    lava: Lava,
    back_platforms: Platforms,
    boxes: Boxes,
    labels: Labels,
    regions: Regions,

    flying_mode: bool,
    flying_camera_position: Vec2,
    flying_camera_scale: f32,
}

fn open_level_stream(path: &Path) -> Result<LineStream, LevelError> {
    LineStream::open(path, LEVEL_LINE_MAX_LENGTH).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl Level {
    /// Load a level. Either every section parses or nothing is kept.
    pub fn from_file(path: &Path) -> Result<Self, LevelError> {
        tracing::info!(path = %path.display(), "Loading level");

        let mut stream = open_level_stream(path)?;
        let background = Background::from_stream(&mut stream)?;
        let mut rigid_bodies = RigidBodies::new(RIGID_BODIES_CAPACITY);
        let player = Player::from_stream(&mut stream, &mut rigid_bodies)?;
        let sections = Sections::from_stream(&mut stream, &mut rigid_bodies)?;

        tracing::info!(
            platforms = sections.platforms.len(),
            goals = sections.goals.len(),
            lava = sections.lava.len(),
            boxes = sections.boxes.count(),
            labels = sections.labels.len(),
            regions = sections.regions.len(),
            "Level loaded"
        );

        Ok(Self {
            file_name: path.to_path_buf(),
            background,
            rigid_bodies,
            player,
            platforms: sections.platforms,
            goals: sections.goals,
            lava: sections.lava,
            back_platforms: sections.back_platforms,
            boxes: sections.boxes,
            labels: sections.labels,
            regions: sections.regions,
            flying_mode: false,
            flying_camera_position: Vec2::ZERO,
            flying_camera_scale: 1.0,
        })
    }

    /// Re-read the level file, keeping the live player and the pool.
    ///
    /// The player section is parsed and thrown away. If anything fails the
    /// level is left exactly as it was.
    pub fn reload_preserve_player(&mut self) -> Result<(), LevelError> {
        tracing::info!(path = %self.file_name.display(), "Soft-reloading level");

        let mut stream = open_level_stream(&self.file_name)?;
        let background = Background::from_stream(&mut stream)?;
        PlayerRecord::parse(&mut stream)?;
        let sections = Sections::from_stream(&mut stream, &mut self.rigid_bodies)?;

        self.background = background;
        self.platforms = sections.platforms;
        self.goals = sections.goals;
        self.lava = sections.lava;
        self.back_platforms = sections.back_platforms;
        let old_boxes = std::mem::replace(&mut self.boxes, sections.boxes);
        old_boxes.release(&mut self.rigid_bodies);
        self.labels = sections.labels;
        self.regions = sections.regions;
        Ok(())
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    pub fn rigid_bodies(&self) -> &RigidBodies {
        &self.rigid_bodies
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn boxes(&self) -> &Boxes {
        &self.boxes
    }

    pub fn goals(&self) -> &Goals {
        &self.goals
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn flying_mode(&self) -> bool {
        self.flying_mode
    }

    /// Advance the simulation. `gravity` is applied to every enabled body.
    ///
    /// # Panics
    /// If `delta_time` is not positive.
    pub fn update(&mut self, delta_time: f32, gravity: Vec2) -> Result<(), LevelError> {
        assert!(delta_time > 0.0, "level update needs a positive delta time, got {}", delta_time);

        self.boxes.float_in_lava(&self.lava, &mut self.rigid_bodies)?;
        self.rigid_bodies.apply_omniforce(gravity);

        self.boxes.update(&mut self.rigid_bodies, delta_time)?;
        self.player.update(&mut self.rigid_bodies, delta_time)?;

        self.rigid_bodies.collide(&self.platforms);

        let hitbox = self.player.hitbox(&self.rigid_bodies)?;
        self.goals.hide_from_player(&hitbox);
        self.player.die_from_lava(&self.lava, &mut self.rigid_bodies)?;

        let mut triggers = self.regions.player_enter(&hitbox);
        triggers.extend(self.regions.player_leave(&hitbox));
        for trigger in triggers {
            if let Err(e) = self.send(&trigger) {
                tracing::warn!(error = %e, command = ?trigger, "region trigger failed");
            }
        }

        self.goals.update(delta_time);
        self.lava.update(delta_time);
        self.labels.update(delta_time);
        Ok(())
    }

    /// Draw back to front. The first failing layer aborts the frame.
    pub fn render(&self, camera: &mut Camera) -> Result<(), LevelError> {
        self.background.render(camera)?;
        self.back_platforms.render(camera)?;
        self.player.render(&self.rigid_bodies, camera)?;
        self.boxes.render(&self.rigid_bodies, camera)?;
        self.lava.render(camera)?;
        self.platforms.render(camera)?;
        self.goals.render(camera)?;
        self.labels.render(camera)?;
        self.regions.render(camera)?;
        Ok(())
    }

    /// Discrete input: jumping, and the flying camera while it is on.
    pub fn event(&mut self, event: &InputEvent) -> Result<(), LevelError> {
        match *event {
            InputEvent::KeyDown(KeyCode::Space) => self.player.jump(&mut self.rigid_bodies)?,
            InputEvent::JoyButtonDown(JUMP_BUTTON) => self.player.jump(&mut self.rigid_bodies)?,
            InputEvent::PointerMotion { dx, dy } if self.flying_mode => {
                self.flying_camera_position += vec2(dx, dy);
            }
            InputEvent::Wheel { dy } if self.flying_mode => {
                if dy > 0.0 {
                    self.flying_camera_scale += FLYING_ZOOM_STEP;
                } else if dy < 0.0 {
                    self.flying_camera_scale =
                        (self.flying_camera_scale - FLYING_ZOOM_STEP).max(FLYING_MIN_SCALE);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Held input. Keys win over the stick, left wins over right.
    pub fn input(&mut self, input: &InputSnapshot) -> Result<(), LevelError> {
        let pool = &mut self.rigid_bodies;
        if input.left {
            self.player.move_left(pool)
        } else if input.right {
            self.player.move_right(pool)
        } else if input.joy_axis_x < 0.0 {
            self.player.move_left(pool)
        } else if input.joy_axis_x > 0.0 {
            self.player.move_right(pool)
        } else {
            self.player.stop(pool)
        }
    }

    pub fn sound(&mut self, sink: &mut dyn SoundSink) {
        self.goals.sound(sink);
        self.player.sound(sink);
    }

    pub fn toggle_debug_mode(&mut self) {
        self.background.toggle_debug_mode();
    }

    /// Position the camera for this frame and let sections react to what
    /// is now in view.
    pub fn enter_camera_event(&mut self, camera: &mut Camera) -> Result<(), LevelError> {
        if self.flying_mode {
            camera.center_at(self.flying_camera_position);
            camera.set_scale(self.flying_camera_scale);
        } else {
            self.player.focus_camera(&self.rigid_bodies, camera)?;
            camera.set_scale(1.0);
        }

        self.goals.cue(camera);
        self.goals.checkpoint(&mut self.player);
        self.labels.enter_camera_event(camera);
        Ok(())
    }

    /// Run a script command against the level.
    pub fn send(&mut self, path: &[Expr]) -> Result<Value, ScriptError> {
        match LevelCommand::parse(path)? {
            LevelCommand::Goal(rest) => self.goals.send(&rest),
            LevelCommand::Label(rest) => self.labels.send(&rest),
            LevelCommand::Box(rest) => {
                let player_id = self.player.body_id();
                let hitbox = self
                    .player
                    .hitbox(&self.rigid_bodies)
                    .map_err(|_| ScriptError::InvalidHandle(player_id.to_raw()))?;
                self.boxes.send(&rest, &mut self.rigid_bodies, hitbox)
            }
            LevelCommand::BodyPush { id, force } => {
                self.rigid_bodies
                    .apply_force(id, force)
                    .map_err(|_| ScriptError::InvalidHandle(id.to_raw()))?;
                Ok(Value::Nil)
            }
            LevelCommand::BodyAdd { rect, color } => {
                let capacity = self.rigid_bodies.capacity();
                let id = self
                    .rigid_bodies
                    .add(rect, color)
                    .map_err(|_| ScriptError::CapacityExceeded {
                        what: "rigid bodies",
                        capacity,
                    })?;
                Ok(Value::Integer(id.to_raw()))
            }
            LevelCommand::Fly => {
                self.flying_mode = !self.flying_mode;
                if self.flying_mode {
                    // Start flying from wherever the player is.
                    if let Ok(hitbox) = self.player.hitbox(&self.rigid_bodies) {
                        self.flying_camera_position = hitbox.center();
                    }
                }
                tracing::info!(flying = self.flying_mode, "Flying mode toggled");
                Ok(Value::Nil)
            }
            LevelCommand::Unknown(name) => Err(ScriptError::unknown_target("level", name)),
        }
    }
}
