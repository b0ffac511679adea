//! 2D math primitives
//!
//! Plain value types shared by the simulation, collision and rendering code.
//! Everything uses screen convention: origin top-left, y grows downward.

mod color;
mod rect;
mod vec;

pub use color::*;
pub use rect::*;
pub use vec::*;
