//! Display mode and the palette it selects.
//!
//! The display mode is an external light/dark signal. It never touches the
//! physics; it only picks which colors particles and connection lines are
//! drawn with. Colors are looked up on every draw call rather than stored on
//! particles, so a mode switch takes effect on the very next frame.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{Rgba, Srgb};
use crate::error::EngineError;

/// All recognized display mode names.
const MODE_NAMES: &[&str] = &["light", "dark"];

/// Light or dark presentation of the hosting page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Light,
    #[default]
    Dark,
}

impl DisplayMode {
    /// Returns a slice of all recognized display mode names.
    pub fn list_names() -> &'static [&'static str] {
        MODE_NAMES
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Light => "light",
            DisplayMode::Dark => "dark",
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Light => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Light,
        }
    }

    /// The palette for this mode.
    pub fn theme(self) -> Theme {
        Theme::for_mode(self)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = EngineError;

    /// Parses `"light"` or `"dark"`, case-insensitive and ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(DisplayMode::Light),
            "dark" => Ok(DisplayMode::Dark),
            _ => Err(EngineError::UnknownDisplayMode(s.to_string())),
        }
    }
}

/// Colors used to draw the field in one display mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Fill color of every particle.
    pub particle: Rgba,
    /// Connection line color; its alpha is replaced per line by the falloff.
    pub line: Rgba,
    /// Opaque page background, used when flattening an offline render.
    pub background: Srgb,
}

impl Theme {
    pub fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Light => Self::light(),
            DisplayMode::Dark => Self::dark(),
        }
    }

    /// Green particles, cyan lines on white.
    pub fn light() -> Self {
        Self {
            particle: Rgba::new(16, 185, 129, 0.6),
            line: Rgba::new(6, 182, 212, 1.0),
            background: Srgb::from_rgb8(255, 255, 255),
        }
    }

    /// Purple particles and lines on near-black.
    pub fn dark() -> Self {
        Self {
            particle: Rgba::new(139, 92, 246, 0.5),
            line: Rgba::new(177, 137, 246, 1.0),
            background: Srgb::from_rgb8(10, 10, 15),
        }
    }

    /// Line color at the given opacity. The opacity is not clamped.
    pub fn line_at(&self, opacity: f64) -> Rgba {
        self.line.with_alpha(opacity)
    }
}
