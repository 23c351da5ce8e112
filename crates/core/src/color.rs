//! Color types for the particle field.
//!
//! [`Srgb`] is an opaque color with `f64` components in [0, 1], parsed from and
//! serialized to `"#rrggbb"`. [`Rgba`] is the draw color handed to a
//! [`Surface`](crate::surface::Surface): 8-bit channels plus an alpha that is
//! passed through as given, so a surface sees exactly the value the connection
//! pass computed (possibly outside [0, 1]).

use std::fmt;

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`. The hex round-trip has 8-bit
/// quantization, which is acceptable since hex colors are inherently 8-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `EngineError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, EngineError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(EngineError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| EngineError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb::from_rgb8(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Builds a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Srgb {
        Srgb {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Quantizes the color to 8-bit channels, clamping out-of-range components.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Draw color: 8-bit RGB plus an unclamped alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color from an [`Srgb`].
    pub fn opaque(color: Srgb) -> Self {
        let [r, g, b] = color.to_rgb8();
        Self { r, g, b, a: 1.0 }
    }

    /// Same channels, different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Alpha clamped to [0, 1], the way a canvas context interprets it.
    /// NaN maps to 0.
    pub fn clamped_alpha(self) -> f64 {
        if self.a.is_nan() {
            0.0
        } else {
            self.a.clamp(0.0, 1.0)
        }
    }

    /// CSS color string, e.g. `rgba(16, 185, 129, 0.6)`.
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}
