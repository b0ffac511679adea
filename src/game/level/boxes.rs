//! Boxes
//!
//! Level-authored crates. Their bodies live in the shared `RigidBodies`
//! pool; `Boxes` only keeps the registration list of ids. Boxes decide the
//! lifetime of their bodies (see `release`) but never own the storage.

use rand::thread_rng;

use crate::game::camera::Camera;
use crate::math::{Color, Rect};
use crate::script::{parse_color, Args, Expr, ScriptError, Value};
use crate::system::LineStream;
use super::error::LevelError;
use super::lava::Lava;
use super::rigid_bodies::{RigidBodies, RigidBodyId};
use super::section::read_count;

const SECTION: &str = "boxes";

pub const BOXES_CAPACITY: usize = 1000;

/// Commands accepted under the `box` target
#[derive(Debug, Clone, PartialEq)]
pub enum BoxCommand {
    /// `new x y w h [color]`
    New { rect: Rect, color: Option<Color> },
    /// `new-here w h [color]`: spawn at the player's position
    NewHere { w: f32, h: f32, color: Option<Color> },
}

impl BoxCommand {
    pub fn parse(path: &[Expr]) -> Result<Self, ScriptError> {
        let mut args = Args::new(path);
        let action = args.name("box action")?;
        match action {
            "new" => {
                let x = args.integer("x")?;
                let y = args.integer("y")?;
                let w = args.integer("w")?;
                let h = args.integer("h")?;
                let color = args.optional_name("color")?.map(parse_color).transpose()?;
                Ok(BoxCommand::New {
                    rect: Rect::new(x as f32, y as f32, w as f32, h as f32),
                    color,
                })
            }
            "new-here" => {
                let w = args.integer("w")?;
                let h = args.integer("h")?;
                let color = args.optional_name("color")?.map(parse_color).transpose()?;
                Ok(BoxCommand::NewHere {
                    w: w as f32,
                    h: h as f32,
                    color,
                })
            }
            other => Err(ScriptError::unknown_target("box", other)),
        }
    }
}

pub struct Boxes {
    body_ids: Vec<RigidBodyId>,
}

impl Boxes {
    /// `count`, then `count` body records registered in the pool.
    ///
    /// On failure every body registered so far is removed from the pool
    /// again.
    pub fn from_stream(
        stream: &mut LineStream,
        rigid_bodies: &mut RigidBodies,
    ) -> Result<Self, LevelError> {
        let count = read_count(stream, SECTION)?;
        tracing::info!(count, "Boxes count");

        if count >= BOXES_CAPACITY {
            return Err(LevelError::parse(
                SECTION,
                format!("{} boxes exceed the capacity of {}", count, BOXES_CAPACITY),
            ));
        }

        let mut boxes = Boxes {
            body_ids: Vec::with_capacity(count),
        };
        for _ in 0..count {
            match rigid_bodies.add_from_stream(stream) {
                Ok(id) => boxes.body_ids.push(id),
                Err(e) => {
                    boxes.release(rigid_bodies);
                    return Err(e);
                }
            }
        }

        Ok(boxes)
    }

    /// Remove every box body from the pool.
    pub fn release(self, rigid_bodies: &mut RigidBodies) {
        for id in self.body_ids {
            if let Err(e) = rigid_bodies.remove(id) {
                tracing::warn!(error = %e, "box body already gone");
            }
        }
    }

    pub fn count(&self) -> usize {
        self.body_ids.len()
    }

    pub fn ids(&self) -> &[RigidBodyId] {
        &self.body_ids
    }

    pub fn update(&self, rigid_bodies: &mut RigidBodies, delta_time: f32) -> Result<(), LevelError> {
        for id in &self.body_ids {
            rigid_bodies.update(*id, delta_time)?;
        }
        Ok(())
    }

    pub fn render(&self, rigid_bodies: &RigidBodies, camera: &mut Camera) -> Result<(), LevelError> {
        for id in &self.body_ids {
            rigid_bodies.render(*id, camera)?;
        }
        Ok(())
    }

    pub fn float_in_lava(&self, lava: &Lava, rigid_bodies: &mut RigidBodies) -> Result<(), LevelError> {
        for id in &self.body_ids {
            lava.float_rigid_body(rigid_bodies, *id)?;
        }
        Ok(())
    }

    fn add_box(
        &mut self,
        rigid_bodies: &mut RigidBodies,
        rect: Rect,
        color: Color,
    ) -> Result<RigidBodyId, ScriptError> {
        if self.body_ids.len() >= BOXES_CAPACITY {
            return Err(ScriptError::CapacityExceeded {
                what: "boxes",
                capacity: BOXES_CAPACITY,
            });
        }
        let id = rigid_bodies.add(rect, color).map_err(|_| ScriptError::CapacityExceeded {
            what: "rigid bodies",
            capacity: rigid_bodies.capacity(),
        })?;
        self.body_ids.push(id);
        Ok(id)
    }

    /// Handle a `box ...` command. `player_hitbox` anchors `new-here`.
    pub fn send(
        &mut self,
        path: &[Expr],
        rigid_bodies: &mut RigidBodies,
        player_hitbox: Rect,
    ) -> Result<Value, ScriptError> {
        let command = BoxCommand::parse(path)?;
        let (rect, color) = match command {
            BoxCommand::New { rect, color } => (rect, color),
            BoxCommand::NewHere { w, h, color } => {
                (Rect::new(player_hitbox.x, player_hitbox.y, w, h), color)
            }
        };
        let color = color.unwrap_or_else(|| Color::random_opaque(&mut thread_rng()));
        self.add_box(rigid_bodies, rect, color)?;
        Ok(Value::Nil)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::camera::recording::recording_camera;
    use crate::script::tokenize;
    use std::io::Cursor;

    fn stream(text: &str) -> LineStream {
        LineStream::from_reader(Cursor::new(text.as_bytes().to_vec()), 512)
    }

    fn send(boxes: &mut Boxes, pool: &mut RigidBodies, line: &str) -> Result<Value, ScriptError> {
        boxes.send(&tokenize(line).unwrap(), pool, Rect::new(70.0, 80.0, 25.0, 25.0))
    }

    #[test]
    fn test_from_stream_registers_bodies() {
        let mut pool = RigidBodies::new(16);
        let mut s = stream("2\n0 0 10 10 ff0000\n5 5 20 20 00ff00\nlabels\n");
        let boxes = Boxes::from_stream(&mut s, &mut pool).unwrap();
        assert_eq!(boxes.count(), 2);
        assert_eq!(pool.count(), 2);
        assert_eq!(pool.hitbox(boxes.ids()[1]).unwrap(), Rect::new(5.0, 5.0, 20.0, 20.0));
        assert_eq!(s.next_line(), Some("labels"));
    }

    #[test]
    fn test_failed_parse_leaves_pool_untouched() {
        let mut pool = RigidBodies::new(16);
        let mut s = stream("3\n0 0 10 10 ff0000\n5 5 20 20 00ff00\n1 1 1\n");
        assert!(Boxes::from_stream(&mut s, &mut pool).is_err());
        assert_eq!(pool.count(), 0);
    }

    #[test]
    fn test_count_over_capacity_is_a_parse_error() {
        let mut pool = RigidBodies::new(16);
        let mut s = stream(&format!("{}\n", BOXES_CAPACITY));
        assert!(matches!(
            Boxes::from_stream(&mut s, &mut pool),
            Err(LevelError::Parse { section: "boxes", .. })
        ));
        assert!(matches!(
            Boxes::from_stream(&mut stream("many\n"), &mut pool),
            Err(LevelError::Parse { section: "boxes", .. })
        ));
    }

    #[test]
    fn test_release_removes_bodies() {
        let mut pool = RigidBodies::new(16);
        let player = pool.add(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE).unwrap();
        let boxes = Boxes::from_stream(&mut stream("2\n0 0 1 1 ff0000\n0 0 1 1 ff0000\n"), &mut pool).unwrap();
        boxes.release(&mut pool);
        assert_eq!(pool.count(), 1);
        assert!(pool.is_alive(player));
    }

    #[test]
    fn test_new_box_command() {
        let mut pool = RigidBodies::new(16);
        let mut boxes = Boxes::from_stream(&mut stream("0\n"), &mut pool).unwrap();

        assert_eq!(send(&mut boxes, &mut pool, "new 10 20 5 5").unwrap(), Value::Nil);
        assert_eq!(boxes.count(), 1);
        let id = boxes.ids()[0];
        assert_eq!(pool.hitbox(id).unwrap(), Rect::new(10.0, 20.0, 5.0, 5.0));
        assert_eq!(pool.get(id).unwrap().color.a, 1.0);

        send(&mut boxes, &mut pool, "new 0 0 1 1 \"00ff00\"").unwrap();
        assert_eq!(pool.get(boxes.ids()[1]).unwrap().color, Color::from_hex("00ff00").unwrap());
    }

    #[test]
    fn test_new_here_uses_player_position() {
        let mut pool = RigidBodies::new(16);
        let mut boxes = Boxes::from_stream(&mut stream("0\n"), &mut pool).unwrap();
        send(&mut boxes, &mut pool, "new-here 30 40").unwrap();
        assert_eq!(pool.hitbox(boxes.ids()[0]).unwrap(), Rect::new(70.0, 80.0, 30.0, 40.0));
    }

    #[test]
    fn test_bad_commands_do_not_spawn() {
        let mut pool = RigidBodies::new(16);
        let mut boxes = Boxes::from_stream(&mut stream("0\n"), &mut pool).unwrap();

        assert_eq!(
            send(&mut boxes, &mut pool, "explode"),
            Err(ScriptError::unknown_target("box", "explode"))
        );
        assert!(send(&mut boxes, &mut pool, "new 1 2 3").is_err());
        assert!(send(&mut boxes, &mut pool, "new 1 2 3 4 nothex").is_err());
        assert_eq!(boxes.count(), 0);
        assert_eq!(pool.count(), 0);
    }

    #[test]
    fn test_spawn_on_full_pool_is_reported() {
        let mut pool = RigidBodies::new(1);
        let mut boxes = Boxes::from_stream(&mut stream("1\n0 0 1 1 ff0000\n"), &mut pool).unwrap();
        assert!(matches!(
            send(&mut boxes, &mut pool, "new 0 0 1 1"),
            Err(ScriptError::CapacityExceeded { what: "rigid bodies", .. })
        ));
        assert_eq!(boxes.count(), 1);
    }

    #[test]
    fn test_render_and_update_forward_in_order() {
        let mut pool = RigidBodies::new(4);
        let boxes = Boxes::from_stream(&mut stream("2\n0 0 1 1 ff0000\n5 0 1 1 00ff00\n"), &mut pool).unwrap();
        let (mut camera, calls) = recording_camera();
        boxes.render(&pool, &mut camera).unwrap();
        assert_eq!(calls.borrow().len(), 2);

        let stale = boxes.ids()[0];
        pool.remove(stale).unwrap();
        assert!(matches!(
            boxes.update(&mut pool, 0.1),
            Err(LevelError::InvalidHandle(id)) if id == stale
        ));
    }
}
