//! Game Module
//!
//! Everything between the window and the level file:
//! - level: sections, rigid body pool and the frame pipeline
//! - camera: world-to-screen mapping over a drawing backend
//! - sound: cues raised by the simulation, played by a sink
//! - level_folder / level_picker: choosing what to play
//! - console: typing level commands at runtime

pub mod camera;
pub mod console;
pub mod level;
pub mod level_folder;
pub mod level_picker;
pub mod sound;

pub use camera::{Camera, MacroquadCanvas};
pub use console::{Console, CONSOLE_TOGGLE_KEY};
pub use level::Level;
pub use level_picker::LevelPicker;
pub use sound::{MacroquadSounds, SoundSink};
