//! Crate error type
//!
//! The simulation itself has no recoverable faults; errors come from level
//! generation giving up and from loading/validating tuning data.

use std::fmt;

/// Errors surfaced by the simulation core
#[derive(Debug)]
pub enum Error {
    /// Target placement constraints could not be met, even after relaxation
    TargetPlacement {
        level: u32,
        placed: usize,
        requested: usize,
    },
    /// Tuning data failed validation
    InvalidTuning(String),
    /// Tuning file could not be read
    Io(std::io::Error),
    /// Tuning file is not valid JSON for `Tuning`
    Json(serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TargetPlacement {
                level,
                placed,
                requested,
            } => write!(
                f,
                "level {}: could only place {} of {} targets",
                level, placed, requested
            ),
            Error::InvalidTuning(reason) => write!(f, "invalid tuning: {}", reason),
            Error::Io(e) => write!(f, "failed to read tuning: {}", e),
            Error::Json(e) => write!(f, "failed to parse tuning: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
