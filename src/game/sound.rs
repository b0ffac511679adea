//! Sound cues
//!
//! Level code never plays audio directly. It reports cues to a `SoundSink`
//! once per frame; the macroquad sink maps each cue to a loaded sample.

use std::collections::HashMap;
use std::path::Path;

use macroquad::audio::{load_sound, play_sound_once, Sound};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A goal came into view for the first time
    GoalSeen,
    Jump,
    Death,
}

impl SoundCue {
    pub const ALL: [SoundCue; 3] = [SoundCue::GoalSeen, SoundCue::Jump, SoundCue::Death];

    /// Sample file name inside the sounds directory
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundCue::GoalSeen => "goal.wav",
            SoundCue::Jump => "jump.wav",
            SoundCue::Death => "death.wav",
        }
    }
}

pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
}

/// Samples loaded through macroquad's audio backend
pub struct MacroquadSounds {
    samples: HashMap<SoundCue, Sound>,
}

impl MacroquadSounds {
    /// Load every cue's sample from `dir`. Missing samples are logged and
    /// that cue stays silent.
    pub async fn load(dir: &Path) -> Self {
        let mut samples = HashMap::new();
        for cue in SoundCue::ALL {
            let path = dir.join(cue.file_name());
            let path_str = path.to_string_lossy();
            match load_sound(&path_str).await {
                Ok(sound) => {
                    samples.insert(cue, sound);
                }
                Err(e) => {
                    tracing::warn!(path = %path_str, error = %e, "could not load sound sample");
                }
            }
        }
        tracing::info!(loaded = samples.len(), "sound samples ready");
        Self { samples }
    }
}

impl SoundSink for MacroquadSounds {
    fn play(&mut self, cue: SoundCue) {
        if let Some(sound) = self.samples.get(&cue) {
            play_sound_once(sound);
        }
    }
}

#[cfg(test)]
pub mod recording {
    use super::*;

    /// Sink that remembers every cue it was asked to play
    #[derive(Debug, Default)]
    pub struct RecordingSounds {
        pub played: Vec<SoundCue>,
    }

    impl SoundSink for RecordingSounds {
        fn play(&mut self, cue: SoundCue) {
            self.played.push(cue);
        }
    }
}
