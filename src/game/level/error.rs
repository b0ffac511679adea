//! Level loading and simulation errors

use std::path::PathBuf;

use super::rigid_bodies::RigidBodyId;

/// Error type for level loading, reloading and per-frame work
#[derive(Debug)]
pub enum LevelError {
    /// The level file could not be opened
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A field in a section is malformed or missing
    Parse {
        section: &'static str,
        message: String,
    },
    /// The file ended in the middle of a section
    UnexpectedEof { section: &'static str },
    /// A fixed-capacity store is full
    CapacityExceeded {
        what: &'static str,
        capacity: usize,
    },
    /// A stale or never-issued rigid body handle
    InvalidHandle(RigidBodyId),
}

impl LevelError {
    pub fn parse(section: &'static str, message: impl Into<String>) -> Self {
        LevelError::Parse {
            section,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::Io { path, source } => {
                write!(f, "Could not open file '{}': {}", path.display(), source)
            }
            LevelError::Parse { section, message } => {
                write!(f, "Parse error in {} section: {}", section, message)
            }
            LevelError::UnexpectedEof { section } => {
                write!(f, "Unexpected end of file in {} section", section)
            }
            LevelError::CapacityExceeded { what, capacity } => {
                write!(f, "Too many {} (capacity {})", what, capacity)
            }
            LevelError::InvalidHandle(id) => write!(f, "Invalid rigid body id {}", id),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
