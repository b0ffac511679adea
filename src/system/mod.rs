//! Platform-facing helpers that sit below the game code

mod line_stream;

pub use line_stream::*;
