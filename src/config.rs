//! Game configuration
//!
//! Read from a RON file at startup. Every field has a default, so the file
//! may be missing or list only what it overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "game.ron";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub levels_dir: PathBuf,
    pub sounds_dir: PathBuf,
    /// Downward acceleration in pixels per second squared
    pub gravity: f32,
    pub window_width: i32,
    pub window_height: i32,
    /// Longest simulated step; slower frames are stretched over several
    /// real frames instead of one big step
    pub max_delta_time: f32,
    /// Skip the level picker and load this file directly
    pub start_level: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            levels_dir: PathBuf::from("levels"),
            sounds_dir: PathBuf::from("sounds"),
            gravity: 1500.0,
            window_width: 800,
            window_height: 600,
            max_delta_time: 1.0 / 30.0,
            start_level: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

impl GameConfig {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&text)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_delta_time > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_delta_time must be positive, got {}",
                self.max_delta_time
            )));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid("gravity must be finite".to_string()));
        }
        if self.window_width <= 0 || self.window_height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be positive, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.levels_dir, PathBuf::from("levels"));
        assert_eq!(config.gravity, 1500.0);
        assert_eq!(config.start_level, None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = GameConfig::from_ron("(gravity: 900.0, start_level: Some(\"levels/intro.txt\"))").unwrap();
        assert_eq!(config.gravity, 900.0);
        assert_eq!(config.start_level, Some(PathBuf::from("levels/intro.txt")));
        assert_eq!(config.window_width, 800);
        assert_eq!(config.sounds_dir, PathBuf::from("sounds"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            GameConfig::from_ron("(max_delta_time: 0.0)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_ron("(window_width: -5)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_ron("(gravity: \"down\")"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_and_present() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("game.ron");
        assert_eq!(GameConfig::load(&path).unwrap(), GameConfig::default());

        std::fs::write(&path, "(levels_dir: \"maps\")").unwrap();
        assert_eq!(GameConfig::load(&path).unwrap().levels_dir, PathBuf::from("maps"));
    }
}
