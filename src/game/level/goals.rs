//! Goals
//!
//! Spinning triangle markers. A goal that scrolls into view for the first
//! time plays a sound once and becomes the player's checkpoint.

use std::f32::consts::PI;

use crate::game::camera::Camera;
use crate::game::sound::{SoundCue, SoundSink};
use crate::math::{vec2, Color, Rect, Vec2};
use crate::script::{Args, Expr, ScriptError, Value};
use crate::system::LineStream;
use super::error::LevelError;
use super::player::Player;
use super::section::{expect_line, read_count, Fields};

const SECTION: &str = "goals";

const GOAL_RADIUS: f32 = 10.0;
/// Markers float this far above their point
const GOAL_HEIGHT: f32 = 30.0;
const GOAL_WAVE_AMPLITUDE: f32 = 5.0;
const GOAL_SPIN_SPEED: f32 = 4.0;

/// Per-goal progress of the "goal seen" cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalCue {
    /// Not in view, or never seen
    Virgin,
    /// Just came into view; the cue has not sounded yet
    HitNothing,
    /// Cue sounded; waits for the goal to leave the view
    SeenNothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalCommand {
    Show(String),
    Hide(String),
}

impl GoalCommand {
    pub fn parse(path: &[Expr]) -> Result<Self, ScriptError> {
        let mut args = Args::new(path);
        let action = args.name("goal action")?;
        match action {
            "show" => Ok(GoalCommand::Show(args.ident("goal id")?)),
            "hide" => Ok(GoalCommand::Hide(args.ident("goal id")?)),
            other => Err(ScriptError::unknown_target("goal", other)),
        }
    }
}

struct Goal {
    id: String,
    position: Vec2,
    color: Color,
    cue: GoalCue,
    /// Cleared while the player stands on the goal
    visible: bool,
    /// Cleared by the `hide` command
    enabled: bool,
}

pub struct Goals {
    goals: Vec<Goal>,
    angle: f32,
}

impl Goals {
    /// `count`, then `count` lines of `id x y color`
    pub fn from_stream(stream: &mut LineStream) -> Result<Self, LevelError> {
        let count = read_count(stream, SECTION)?;
        let mut goals = Vec::with_capacity(count);
        for _ in 0..count {
            let line = expect_line(stream, SECTION)?;
            let mut fields = Fields::new(line, SECTION);
            let id = fields.next_word("id")?.to_string();
            let x = fields.next_f32("x")?;
            let y = fields.next_f32("y")?;
            let color = fields.next_color("color")?;
            goals.push(Goal {
                id,
                position: vec2(x, y),
                color,
                cue: GoalCue::Virgin,
                visible: true,
                enabled: true,
            });
        }
        Ok(Self { goals, angle: 0.0 })
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn cue_of(&self, id: &str) -> Option<GoalCue> {
        self.find(id).map(|g| g.cue)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.find(id).map_or(false, |g| g.visible && g.enabled)
    }

    fn find(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn hide_from_player(&mut self, player_hitbox: &Rect) {
        for goal in &mut self.goals {
            goal.visible = !player_hitbox.contains_point(goal.position);
        }
    }

    pub fn cue(&mut self, camera: &Camera) {
        for goal in &mut self.goals {
            let in_view = camera.is_point_visible(goal.position);
            goal.cue = match (goal.cue, in_view) {
                (GoalCue::Virgin, true) => GoalCue::HitNothing,
                (_, false) => GoalCue::Virgin,
                (cue, true) => cue,
            };
        }
    }

    pub fn checkpoint(&self, player: &mut Player) {
        for goal in self.goals.iter().filter(|g| g.cue == GoalCue::HitNothing) {
            player.checkpoint(goal.position);
        }
    }

    pub fn sound(&mut self, sink: &mut dyn SoundSink) {
        for goal in self.goals.iter_mut().filter(|g| g.cue == GoalCue::HitNothing) {
            sink.play(SoundCue::GoalSeen);
            goal.cue = GoalCue::SeenNothing;
        }
    }

    pub fn update(&mut self, delta_time: f32) {
        self.angle = (self.angle + GOAL_SPIN_SPEED * delta_time) % (2.0 * PI);
    }

    pub fn render(&self, camera: &mut Camera) -> Result<(), LevelError> {
        for (i, goal) in self.goals.iter().enumerate() {
            if !goal.visible || !goal.enabled {
                continue;
            }

            let wave = (self.angle + i as f32).sin() * GOAL_WAVE_AMPLITUDE;
            let center = goal.position + vec2(0.0, -GOAL_HEIGHT + wave);
            let vertex = |k: f32| {
                let a = self.angle + k * 2.0 * PI / 3.0;
                center + vec2(a.cos(), a.sin()) * GOAL_RADIUS
            };
            camera.fill_triangle(vertex(0.0), vertex(1.0), vertex(2.0), goal.color);
        }
        Ok(())
    }

    pub fn send(&mut self, path: &[Expr]) -> Result<Value, ScriptError> {
        let (id, enabled) = match GoalCommand::parse(path)? {
            GoalCommand::Show(id) => (id, true),
            GoalCommand::Hide(id) => (id, false),
        };
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| ScriptError::unknown_target("goal", id.as_str()))?;
        goal.enabled = enabled;
        Ok(Value::Nil)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::camera::recording::recording_camera;
    use crate::game::level::rigid_bodies::RigidBodies;
    use crate::game::sound::recording::RecordingSounds;
    use crate::script::tokenize;
    use std::io::Cursor;

    fn goals(text: &str) -> Goals {
        let mut s = LineStream::from_reader(Cursor::new(text.as_bytes().to_vec()), 512);
        Goals::from_stream(&mut s).unwrap()
    }

    fn two_goals() -> Goals {
        goals("2\nnear 100 100 00ff00\nfar 5000 100 00ff00\n")
    }

    #[test]
    fn test_parse() {
        let g = two_goals();
        assert_eq!(g.len(), 2);
        assert!(g.is_visible("near"));
        assert!(!g.is_visible("missing"));
    }

    #[test]
    fn test_cue_state_machine() {
        let mut g = two_goals();
        let (mut camera, _) = recording_camera();
        let mut sink = RecordingSounds::default();

        g.cue(&camera);
        assert_eq!(g.cue_of("near"), Some(GoalCue::HitNothing));
        assert_eq!(g.cue_of("far"), Some(GoalCue::Virgin));

        g.sound(&mut sink);
        assert_eq!(sink.played, vec![SoundCue::GoalSeen]);
        assert_eq!(g.cue_of("near"), Some(GoalCue::SeenNothing));

        // still in view: no second cue
        g.cue(&camera);
        g.sound(&mut sink);
        assert_eq!(sink.played.len(), 1);

        // leaving the view rearms the goal
        camera.center_at(vec2(5000.0, 300.0));
        g.cue(&camera);
        assert_eq!(g.cue_of("near"), Some(GoalCue::Virgin));
        assert_eq!(g.cue_of("far"), Some(GoalCue::HitNothing));
    }

    #[test]
    fn test_checkpoint_from_fresh_goal() {
        let mut g = two_goals();
        let mut pool = RigidBodies::new(4);
        let mut s = LineStream::from_reader(Cursor::new(b"0 0 ffffff\n".to_vec()), 512);
        let mut player = Player::from_stream(&mut s, &mut pool).unwrap();
        let (camera, _) = recording_camera();

        g.checkpoint(&mut player);
        assert_eq!(player.checkpoint_position(), vec2(0.0, 0.0));

        g.cue(&camera);
        g.checkpoint(&mut player);
        assert_eq!(player.checkpoint_position(), vec2(100.0, 100.0));
    }

    #[test]
    fn test_hide_from_player() {
        let mut g = two_goals();
        g.hide_from_player(&Rect::new(90.0, 90.0, 25.0, 25.0));
        assert!(!g.is_visible("near"));
        assert!(g.is_visible("far"));

        g.hide_from_player(&Rect::new(0.0, 0.0, 25.0, 25.0));
        assert!(g.is_visible("near"));
    }

    #[test]
    fn test_commands() {
        let mut g = goals("2\n1 100 100 00ff00\nexit 200 100 00ff00\n");
        assert_eq!(g.send(&tokenize("hide 1").unwrap()), Ok(Value::Nil));
        assert!(!g.is_visible("1"));
        g.send(&tokenize("show 1").unwrap()).unwrap();
        assert!(g.is_visible("1"));

        assert_eq!(
            g.send(&tokenize("explode exit").unwrap()),
            Err(ScriptError::unknown_target("goal", "explode"))
        );
        assert_eq!(
            g.send(&tokenize("hide nope").unwrap()),
            Err(ScriptError::unknown_target("goal", "nope"))
        );
        assert!(g.send(&tokenize("hide").unwrap()).is_err());
    }

    #[test]
    fn test_render_skips_hidden() {
        let mut g = two_goals();
        let (mut camera, calls) = recording_camera();
        g.render(&mut camera).unwrap();
        assert_eq!(calls.borrow().len(), 2);

        calls.borrow_mut().clear();
        g.send(&tokenize("hide near").unwrap()).unwrap();
        g.render(&mut camera).unwrap();
        assert_eq!(calls.borrow().len(), 1);
    }
}
