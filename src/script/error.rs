//! Errors reported back to the script evaluator
//!
//! None of these are fatal to the simulation: the command that raised one is
//! dropped and the frame carries on.

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// Unrecognized path segment for a target (`target` is who was asked)
    UnknownTarget { target: &'static str, name: String },
    /// An argument had the wrong type
    WrongArgument { expected: &'static str, got: String },
    /// The command ended before a required argument
    MissingArgument { expected: &'static str },
    /// A body id that does not name a live body
    InvalidHandle(i64),
    /// A fixed-capacity store is full
    CapacityExceeded { what: &'static str, capacity: usize },
    /// The command line could not be split into expressions
    Tokenize(String),
}

impl ScriptError {
    pub fn unknown_target(target: &'static str, name: impl Into<String>) -> Self {
        ScriptError::UnknownTarget {
            target,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptError::UnknownTarget { target, name } => {
                write!(f, "{} does not know about '{}'", target, name)
            }
            ScriptError::WrongArgument { expected, got } => {
                write!(f, "expected {}, got {}", expected, got)
            }
            ScriptError::MissingArgument { expected } => {
                write!(f, "missing argument: expected {}", expected)
            }
            ScriptError::InvalidHandle(id) => write!(f, "no live body with id {}", id),
            ScriptError::CapacityExceeded { what, capacity } => {
                write!(f, "cannot add more {} (capacity {})", what, capacity)
            }
            ScriptError::Tokenize(msg) => write!(f, "could not read command: {}", msg),
        }
    }
}

impl std::error::Error for ScriptError {}
