//! Labels
//!
//! World-space text. A label fades in whenever it scrolls into view and can
//! be faded out or back in by scripts.

use crate::game::camera::Camera;
use crate::math::{vec2, Color, Vec2};
use crate::script::{Args, Expr, ScriptError, Value};
use crate::system::LineStream;
use super::error::LevelError;
use super::section::{expect_line, read_count, Fields};

const SECTION: &str = "labels";

const LABEL_FONT_SIZE: f32 = 32.0;
/// Seconds for a full fade in or out
const LABEL_FADE_DURATION: f32 = 0.5;
/// Labels slide up by this much while fading in
const LABEL_RISE: f32 = 20.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelCommand {
    Show(String),
    Hide(String),
}

impl LabelCommand {
    pub fn parse(path: &[Expr]) -> Result<Self, ScriptError> {
        let mut args = Args::new(path);
        let action = args.name("label action")?;
        match action {
            "show" => Ok(LabelCommand::Show(args.ident("label id")?)),
            "hide" => Ok(LabelCommand::Hide(args.ident("label id")?)),
            other => Err(ScriptError::unknown_target("label", other)),
        }
    }
}

struct Label {
    id: String,
    position: Vec2,
    color: Color,
    text: String,
    shown: bool,
    /// 0.0 = invisible, 1.0 = fully faded in
    alpha: f32,
    in_view: bool,
}

pub struct Labels {
    labels: Vec<Label>,
}

impl Labels {
    /// `count`, then per label an `id x y color` line and a text line
    pub fn from_stream(stream: &mut LineStream) -> Result<Self, LevelError> {
        let count = read_count(stream, SECTION)?;
        let mut labels = Vec::with_capacity(count);
        for _ in 0..count {
            let line = expect_line(stream, SECTION)?;
            let mut fields = Fields::new(line, SECTION);
            let id = fields.next_word("id")?.to_string();
            let x = fields.next_f32("x")?;
            let y = fields.next_f32("y")?;
            let color = fields.next_color("color")?;

            let text = expect_line(stream, SECTION)?.to_string();
            labels.push(Label {
                id,
                position: vec2(x, y),
                color,
                text,
                shown: true,
                alpha: 0.0,
                in_view: false,
            });
        }
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn text_of(&self, id: &str) -> Option<&str> {
        self.find(id).map(|l| l.text.as_str())
    }

    pub fn alpha_of(&self, id: &str) -> Option<f32> {
        self.find(id).map(|l| l.alpha)
    }

    fn find(&self, id: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.id == id)
    }

    /// Restart the fade-in of every label that just came into view.
    pub fn enter_camera_event(&mut self, camera: &Camera) {
        for label in &mut self.labels {
            let in_view = camera.is_point_visible(label.position);
            if in_view && !label.in_view && label.shown {
                label.alpha = 0.0;
            }
            label.in_view = in_view;
        }
    }

    pub fn update(&mut self, delta_time: f32) {
        let step = delta_time / LABEL_FADE_DURATION;
        for label in &mut self.labels {
            label.alpha = if label.shown {
                (label.alpha + step).min(1.0)
            } else {
                (label.alpha - step).max(0.0)
            };
        }
    }

    pub fn render(&self, camera: &mut Camera) -> Result<(), LevelError> {
        for label in self.labels.iter().filter(|l| l.alpha > 0.0) {
            let offset = vec2(0.0, (1.0 - label.alpha) * LABEL_RISE);
            camera.draw_text(
                &label.text,
                label.position + offset,
                LABEL_FONT_SIZE,
                label.color.with_alpha(label.color.a * label.alpha),
            );
        }
        Ok(())
    }

    pub fn send(&mut self, path: &[Expr]) -> Result<Value, ScriptError> {
        let (id, shown) = match LabelCommand::parse(path)? {
            LabelCommand::Show(id) => (id, true),
            LabelCommand::Hide(id) => (id, false),
        };
        let label = self
            .labels
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| ScriptError::unknown_target("label", id.as_str()))?;
        label.shown = shown;
        Ok(Value::Nil)
    }
}
