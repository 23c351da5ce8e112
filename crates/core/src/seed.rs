//! Reproducible description of an offline render.
//!
//! A [`Seed`] captures everything a headless host needs to recreate a frame:
//! surface size, display mode, parameter overrides, PRNG seed, frame count, and
//! an optional fixed pointer position.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::theme::DisplayMode;

/// Reproducible specification of a rendered particle field.
///
/// Two identical `Seed` values produce bit-identical frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub mode: DisplayMode,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
    /// Pointer held at this position for every frame; absent when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<[f64; 2]>,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Seed {
    /// Creates a seed with default mode, params (`{}`), zero frames and no pointer.
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            mode: DisplayMode::default(),
            params: empty_params(),
            seed,
            frames: 0,
            pointer: None,
        }
    }

    /// Validates that the surface is non-empty and its pixel buffer size
    /// (`width * height * 4` bytes) fits in memory addressing.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(())
    }
}
