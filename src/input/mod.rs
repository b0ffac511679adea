//! Input handling with gamepad support
//!
//! Native: Uses gilrs crate for cross-platform gamepad input
//! WASM: keyboard and mouse only

mod gamepad;
mod state;

pub use gamepad::button;
pub use state::*;
