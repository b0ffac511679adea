//! Level-wide command routing
//!
//! The first path segment picks a target. `goal`, `label` and `box` forward
//! the rest of the path to their own command types; the body commands and
//! `fly` are handled by the level itself.

use crate::game::level::RigidBodyId;
use crate::math::{vec2, Color, Rect, Vec2};
use super::error::ScriptError;
use super::expr::{Args, Expr};

#[derive(Debug, Clone, PartialEq)]
pub enum LevelCommand {
    Goal(Vec<Expr>),
    Label(Vec<Expr>),
    Box(Vec<Expr>),
    BodyPush { id: RigidBodyId, force: Vec2 },
    BodyAdd { rect: Rect, color: Color },
    Fly,
    /// Anything else; dispatching it reports `UnknownTarget("level", ..)`
    Unknown(String),
}

impl LevelCommand {
    /// Validate a whole command path without touching any level state.
    pub fn parse(path: &[Expr]) -> Result<Self, ScriptError> {
        let mut args = Args::new(path);
        let target = args.name("target")?;

        let command = match target {
            "goal" => LevelCommand::Goal(args.rest().to_vec()),
            "label" => LevelCommand::Label(args.rest().to_vec()),
            "box" => LevelCommand::Box(args.rest().to_vec()),
            "body-push" => {
                let raw = args.integer("body id")?;
                let dx = args.integer("force x")?;
                let dy = args.integer("force y")?;
                let id = RigidBodyId::from_raw(raw).ok_or(ScriptError::InvalidHandle(raw))?;
                LevelCommand::BodyPush {
                    id,
                    force: vec2(dx as f32, dy as f32),
                }
            }
            "body-add" => {
                let x = args.integer("x")?;
                let y = args.integer("y")?;
                let w = args.integer("w")?;
                let h = args.integer("h")?;
                let color = parse_color(args.name("color")?)?;
                LevelCommand::BodyAdd {
                    rect: Rect::new(x as f32, y as f32, w as f32, h as f32),
                    color,
                }
            }
            "fly" => LevelCommand::Fly,
            other => LevelCommand::Unknown(other.to_string()),
        };

        Ok(command)
    }
}

/// Hex color argument
pub fn parse_color(s: &str) -> Result<Color, ScriptError> {
    Color::from_hex(s).ok_or_else(|| ScriptError::WrongArgument {
        expected: "hex color",
        got: s.to_string(),
    })
}
