//! Error types for the particle-field core.
//!
//! The simulation itself never fails; these cover the edges where host or
//! user input enters the system (render sizes, display-mode names, colors,
//! parameter overrides) and the I/O performed by snapshot writers.

use thiserror::Error;

/// Errors produced at the fallible edges of the particle field.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A display mode name other than `light` or `dark`.
    #[error("unknown display mode: {0}")]
    UnknownDisplayMode(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A parameter was present but outside its valid range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// Writing a snapshot or other output failed.
    #[error("i/o error: {0}")]
    Io(String),
}
