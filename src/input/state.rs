//! Input state management
//!
//! Polls keyboard and mouse (macroquad) and the gamepad once per frame and
//! hands the result to the game in two shapes: discrete `InputEvent`s for
//! things that happen once (key presses, wheel ticks) and an `InputSnapshot`
//! of what is currently held.

use macroquad::input::{get_keys_pressed, is_key_down, mouse_delta_position, mouse_wheel, KeyCode};
use macroquad::window::{screen_height, screen_width};

use super::gamepad::Gamepad;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    JoyButtonDown(u32),
    /// Pointer movement in screen pixels since the last frame
    PointerMotion { dx: f32, dy: f32 },
    /// Scroll wheel; positive is away from the user
    Wheel { dy: f32 },
}

/// Held movement input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    /// Gamepad horizontal axis, -1.0..=1.0, deadzone applied
    pub joy_axis_x: f32,
}

/// Unified input state that handles both keyboard/mouse and gamepad
pub struct InputState {
    gamepad: Gamepad,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            gamepad: Gamepad::new(),
        }
    }

    /// Call once per frame. Returns the events of this frame, in the order
    /// keys, gamepad buttons, pointer, wheel.
    pub fn poll(&mut self) -> Vec<InputEvent> {
        let mut events: Vec<InputEvent> = get_keys_pressed().into_iter().map(InputEvent::KeyDown).collect();

        events.extend(self.gamepad.poll().into_iter().map(InputEvent::JoyButtonDown));

        // Relative motion keeps coming while the cursor is grabbed.
        let local = mouse_delta_position();
        if let Some(event) = pointer_motion((local.x, local.y), (screen_width(), screen_height())) {
            events.push(event);
        }

        let (_, wheel) = mouse_wheel();
        if wheel != 0.0 {
            events.push(InputEvent::Wheel { dy: wheel });
        }

        events
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            left: is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::D),
            joy_axis_x: self.gamepad.axis_x(),
        }
    }

}

/// Pixel motion from macroquad's frame delta, which is in [-1, 1] window
/// units and points from the current position back to the previous one.
fn pointer_motion(local_delta: (f32, f32), viewport: (f32, f32)) -> Option<InputEvent> {
    let dx = -local_delta.0 * viewport.0 * 0.5;
    let dy = -local_delta.1 * viewport.1 * 0.5;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    Some(InputEvent::PointerMotion { dx, dy })
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
