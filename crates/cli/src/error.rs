//! CLI failures and the process exit code each one maps to.
//!
//! clap exits with 2 on its own before any of this runs.

use particle_field_core::EngineError;
use thiserror::Error;

pub const EXIT_ENGINE: i32 = 10;
pub const EXIT_IO: i32 = 11;
pub const EXIT_INPUT: i32 = 12;
pub const EXIT_SERIALIZATION: i32 = 13;

#[derive(Debug, Error)]
pub enum CliError {
    /// Rejected by the simulation: dimensions or parameter values.
    #[error(transparent)]
    Engine(EngineError),
    /// Reading a seed file or writing the snapshot.
    #[error("{0}")]
    Io(String),
    /// Malformed user input: mode name, params JSON, pointer, seed file.
    #[error("{0}")]
    Input(String),
    #[error("cannot encode output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Engine(_) => EXIT_ENGINE,
            Self::Io(_) => EXIT_IO,
            Self::Input(_) => EXIT_INPUT,
            Self::Serialization(_) => EXIT_SERIALIZATION,
        }
    }
}

/// Failures the user can fix by editing the command line count as input
/// errors, not engine errors.
impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => Self::Io(msg),
            EngineError::UnknownDisplayMode(_) | EngineError::InvalidColor(_) => {
                Self::Input(e.to_string())
            }
            other => Self::Engine(other),
        }
    }
}
