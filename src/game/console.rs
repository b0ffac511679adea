//! Command console
//!
//! A one-line prompt over the top of the screen. Backquote opens it, Enter
//! runs the line as a level command, and the last few lines of output stay
//! visible above the prompt.

use macroquad::input::KeyCode;

use crate::game::camera::Camera;
use crate::game::level::Level;
use crate::input::InputEvent;
use crate::math::{rgba, vec2, Color, Rect};
use crate::script::{tokenize, Expr, ScriptError, Value};

pub const CONSOLE_TOGGLE_KEY: KeyCode = KeyCode::GraveAccent;
const HISTORY_LINES: usize = 6;
const FONT_SIZE: f32 = 20.0;
const LINE_HEIGHT: f32 = 22.0;
const PANEL_COLOR: Color = rgba(0.0, 0.0, 0.0, 0.75);
const TEXT_COLOR: Color = rgba(0.9, 0.9, 0.9, 1.0);
const ERROR_COLOR: Color = rgba(1.0, 0.4, 0.4, 1.0);

/// Something console commands can be sent to
pub trait CommandTarget {
    fn send(&mut self, path: &[Expr]) -> Result<Value, ScriptError>;
}

impl CommandTarget for Level {
    fn send(&mut self, path: &[Expr]) -> Result<Value, ScriptError> {
        Level::send(self, path)
    }
}

struct HistoryLine {
    text: String,
    is_error: bool,
}

#[derive(Default)]
pub struct Console {
    enabled: bool,
    input: String,
    history: Vec<HistoryLine>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        self.input.clear();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Typed characters, e.g. from macroquad's `get_char_pressed`
    pub fn type_char(&mut self, c: char) {
        if self.enabled && !c.is_control() && c != '`' {
            self.input.push(c);
        }
    }

    fn push_history(&mut self, text: String, is_error: bool) {
        self.history.push(HistoryLine { text, is_error });
        if self.history.len() > HISTORY_LINES {
            self.history.remove(0);
        }
    }

    /// Run the current line. `None` if the line was blank.
    pub fn submit(&mut self, target: &mut dyn CommandTarget) -> Option<Result<Value, ScriptError>> {
        let line = std::mem::take(&mut self.input);
        if line.trim().is_empty() {
            return None;
        }
        self.push_history(format!("> {}", line), false);

        let result = tokenize(&line).and_then(|path| target.send(&path));
        match &result {
            Ok(value) => {
                tracing::info!(command = %line, result = %value, "console command");
                self.push_history(value.to_string(), false);
            }
            Err(e) => {
                tracing::warn!(command = %line, error = %e, "console command failed");
                self.push_history(format!("error: {}", e), true);
            }
        }
        Some(result)
    }

    /// Handle an event while open. Returns true when the event was consumed.
    pub fn event(&mut self, event: &InputEvent, target: &mut dyn CommandTarget) -> bool {
        if !self.enabled {
            return false;
        }
        match *event {
            InputEvent::KeyDown(KeyCode::Enter) | InputEvent::KeyDown(KeyCode::KpEnter) => {
                self.submit(target);
            }
            InputEvent::KeyDown(KeyCode::Backspace) => {
                self.input.pop();
            }
            InputEvent::KeyDown(KeyCode::Escape) => self.toggle(),
            _ => {}
        }
        true
    }

    pub fn render(&self, camera: &mut Camera) {
        if !self.enabled {
            return;
        }
        let width = camera.viewport().x;
        let height = LINE_HEIGHT * (self.history.len() + 1) as f32 + 8.0;
        camera.fill_screen_rect(Rect::new(0.0, 0.0, width, height), PANEL_COLOR);

        for (i, line) in self.history.iter().enumerate() {
            let color = if line.is_error { ERROR_COLOR } else { TEXT_COLOR };
            camera.draw_screen_text(&line.text, vec2(8.0, LINE_HEIGHT * (i + 1) as f32), FONT_SIZE, color);
        }
        let prompt_y = LINE_HEIGHT * (self.history.len() + 1) as f32;
        camera.draw_screen_text(&format!("> {}_", self.input), vec2(8.0, prompt_y), FONT_SIZE, TEXT_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::camera::recording::{recording_camera, DrawCall};

    /// Remembers every command and answers with its length
    #[derive(Default)]
    struct Echo {
        received: Vec<Vec<Expr>>,
    }

    impl CommandTarget for Echo {
        fn send(&mut self, path: &[Expr]) -> Result<Value, ScriptError> {
            self.received.push(path.to_vec());
            match path.first() {
                Some(Expr::Symbol(s)) if s == "bogus" => Err(ScriptError::unknown_target("level", "bogus")),
                _ => Ok(Value::Integer(path.len() as i64)),
            }
        }
    }

    fn type_line(console: &mut Console, line: &str) {
        for c in line.chars() {
            console.type_char(c);
        }
    }

    #[test]
    fn test_typing_only_when_open() {
        let mut console = Console::new();
        type_line(&mut console, "fly");
        assert_eq!(console.input(), "");

        console.toggle();
        type_line(&mut console, "`fly\n");
        assert_eq!(console.input(), "fly");
    }

    #[test]
    fn test_submit_sends_tokenized_line() {
        let mut console = Console::new();
        let mut echo = Echo::default();
        console.toggle();
        type_line(&mut console, "(box new 1 2 3 4)");

        assert!(console.event(&InputEvent::KeyDown(KeyCode::Enter), &mut echo));
        assert_eq!(echo.received.len(), 1);
        assert_eq!(echo.received[0][0], Expr::symbol("box"));
        assert_eq!(console.input(), "");
    }

    #[test]
    fn test_errors_are_reported_not_sent() {
        let mut console = Console::new();
        let mut echo = Echo::default();
        console.toggle();

        type_line(&mut console, "label \"open");
        assert!(matches!(console.submit(&mut echo), Some(Err(ScriptError::Tokenize(_)))));
        assert!(echo.received.is_empty());

        type_line(&mut console, "bogus");
        assert_eq!(
            console.submit(&mut echo),
            Some(Err(ScriptError::unknown_target("level", "bogus")))
        );
        assert_eq!(console.submit(&mut echo), None);
    }

    #[test]
    fn test_closed_console_ignores_events() {
        let mut console = Console::new();
        let mut echo = Echo::default();
        assert!(!console.event(&InputEvent::KeyDown(KeyCode::Enter), &mut echo));
        assert!(echo.received.is_empty());
    }

    #[test]
    fn test_history_is_bounded_and_rendered() {
        let mut console = Console::new();
        let mut echo = Echo::default();
        console.toggle();
        for _ in 0..10 {
            type_line(&mut console, "fly");
            console.submit(&mut echo);
        }
        assert_eq!(console.history.len(), HISTORY_LINES);

        let (mut camera, calls) = recording_camera();
        console.render(&mut camera);
        let calls = calls.borrow();
        assert!(matches!(calls[0], DrawCall::FillRect(..)));
        assert!(matches!(calls.last(), Some(DrawCall::Text(t, _)) if t == "> _"));
    }
}
