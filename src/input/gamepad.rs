//! Gamepad support
//!
//! Native: gilrs, first connected pad only.
//! WASM: no gamepad; every query reports an idle pad.

// Button indices in the usual joystick numbering (Xbox layout)
pub mod button {
    pub const A: u32 = 0;           // South
    pub const B: u32 = 1;           // East
    pub const X: u32 = 2;           // West
    pub const Y: u32 = 3;           // North
    pub const LB: u32 = 4;
    pub const RB: u32 = 5;
    pub const SELECT: u32 = 6;
    pub const START: u32 = 7;
}

/// Stick values below this are treated as centered
pub const STICK_DEADZONE: f32 = 0.15;

// ============================================================================
// WASM stub
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod platform {
    pub struct Gamepad;

    impl Gamepad {
        pub fn new() -> Self {
            Self
        }

        pub fn poll(&mut self) -> Vec<u32> {
            Vec::new()
        }

        pub fn axis_x(&self) -> f32 {
            0.0
        }
    }

    impl Default for Gamepad {
        fn default() -> Self {
            Self::new()
        }
    }
}

// ============================================================================
// Native Implementation (gilrs)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use gilrs::{Axis, Button as GilrsButton, EventType, Gilrs};

    use super::{apply_deadzone, button, STICK_DEADZONE};

    pub struct Gamepad {
        /// `None` when the platform backend failed to start
        gilrs: Option<Gilrs>,
    }

    impl Gamepad {
        pub fn new() -> Self {
            let gilrs = match Gilrs::new() {
                Ok(gilrs) => Some(gilrs),
                Err(e) => {
                    tracing::warn!(error = %e, "gamepad support unavailable");
                    None
                }
            };
            Self { gilrs }
        }

        /// Drain pending gilrs events; returns the buttons pressed since the
        /// last poll.
        pub fn poll(&mut self) -> Vec<u32> {
            let mut pressed = Vec::new();
            let Some(gilrs) = self.gilrs.as_mut() else { return pressed };

            while let Some(event) = gilrs.next_event() {
                match event.event {
                    EventType::ButtonPressed(b, _) => {
                        if let Some(index) = button_index(b) {
                            pressed.push(index);
                        }
                    }
                    EventType::Connected => tracing::info!(id = ?event.id, "gamepad connected"),
                    EventType::Disconnected => tracing::info!(id = ?event.id, "gamepad disconnected"),
                    _ => {}
                }
            }
            pressed
        }

        /// Horizontal axis of the left stick, deadzone applied
        pub fn axis_x(&self) -> f32 {
            let Some(gilrs) = self.gilrs.as_ref() else { return 0.0 };
            let Some((_, gp)) = gilrs.gamepads().next() else { return 0.0 };
            apply_deadzone(gp.value(Axis::LeftStickX), STICK_DEADZONE)
        }
    }

    impl Default for Gamepad {
        fn default() -> Self {
            Self::new()
        }
    }

    pub(super) fn button_index(b: GilrsButton) -> Option<u32> {
        let index = match b {
            GilrsButton::South => button::A,
            GilrsButton::East => button::B,
            GilrsButton::West => button::X,
            GilrsButton::North => button::Y,
            GilrsButton::LeftTrigger => button::LB,
            GilrsButton::RightTrigger => button::RB,
            GilrsButton::Select => button::SELECT,
            GilrsButton::Start => button::START,
            _ => return None,
        };
        Some(index)
    }
}

// ============================================================================
// Shared utilities
// ============================================================================

/// Zero inside the deadzone, rescaled linearly to 0.0..1.0 outside it
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    let magnitude = value.abs();
    if magnitude < deadzone {
        return 0.0;
    }
    value.signum() * (magnitude - deadzone) / (1.0 - deadzone)
}

pub use platform::Gamepad;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadzone() {
        assert_eq!(apply_deadzone(0.1, 0.15), 0.0);
        assert_eq!(apply_deadzone(-0.1, 0.15), 0.0);
        assert!((apply_deadzone(1.0, 0.15) - 1.0).abs() < 1e-6);
        assert!((apply_deadzone(-1.0, 0.15) + 1.0).abs() < 1e-6);
        assert!(apply_deadzone(-0.5, 0.15) < 0.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_button_mapping() {
        use gilrs::Button;
        assert_eq!(platform::button_index(Button::East), Some(button::B));
        assert_eq!(platform::button_index(Button::South), Some(button::A));
        assert_eq!(platform::button_index(Button::DPadUp), None);
    }
}
