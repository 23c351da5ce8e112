//! Tunable constants of the particle field, and JSON helpers to override them.
//!
//! [`FieldParams::default`] reproduces the stock backdrop. Overrides come in as
//! a JSON object (CLI `--params`, wasm host); missing or wrong-typed keys fall
//! back to the defaults and [`FieldParams::validate`] rejects values that
//! would make the simulation degenerate.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::EngineError;

/// Surface area (px²) per particle.
const DEFAULT_DENSITY_AREA: f64 = 9000.0;
/// Lower bound of the particle radius range.
const DEFAULT_MIN_RADIUS: f64 = 1.0;
/// Upper bound (exclusive) of the particle radius range.
const DEFAULT_MAX_RADIUS: f64 = 3.0;
/// Velocity components are drawn from [-max_speed, max_speed).
const DEFAULT_MAX_SPEED: f64 = 0.2;
/// Pixels a particle is pushed per axis per frame while near the pointer.
const DEFAULT_REPULSION_STEP: f64 = 3.0;
/// Radius multiple a particle must keep from an edge to be pushed toward it.
const DEFAULT_EDGE_GUARD: f64 = 10.0;
/// Connection threshold is `(width / d) * (height / d)` squared pixels.
const DEFAULT_CONNECT_DIVISOR: f64 = 7.0;
/// Line alpha is `1 - d² / falloff`.
const DEFAULT_OPACITY_FALLOFF: f64 = 20000.0;
/// Connection line stroke width in pixels.
const DEFAULT_LINE_WIDTH: f64 = 1.0;
/// Pointer radius is `(height / d) * (width / d)`.
const DEFAULT_POINTER_DIVISOR: f64 = 100.0;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts both JSON numbers (including integers) and converts them to f64.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Field parameters. Use [`Default`] for the stock backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    pub density_area: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub max_speed: f64,
    pub repulsion_step: f64,
    pub edge_guard: f64,
    pub connect_divisor: f64,
    pub opacity_falloff: f64,
    pub line_width: f64,
    pub pointer_divisor: f64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            density_area: DEFAULT_DENSITY_AREA,
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            max_speed: DEFAULT_MAX_SPEED,
            repulsion_step: DEFAULT_REPULSION_STEP,
            edge_guard: DEFAULT_EDGE_GUARD,
            connect_divisor: DEFAULT_CONNECT_DIVISOR,
            opacity_falloff: DEFAULT_OPACITY_FALLOFF,
            line_width: DEFAULT_LINE_WIDTH,
            pointer_divisor: DEFAULT_POINTER_DIVISOR,
        }
    }
}

impl FieldParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            density_area: param_f64(params, "density_area", DEFAULT_DENSITY_AREA),
            min_radius: param_f64(params, "min_radius", DEFAULT_MIN_RADIUS),
            max_radius: param_f64(params, "max_radius", DEFAULT_MAX_RADIUS),
            max_speed: param_f64(params, "max_speed", DEFAULT_MAX_SPEED),
            repulsion_step: param_f64(params, "repulsion_step", DEFAULT_REPULSION_STEP),
            edge_guard: param_f64(params, "edge_guard", DEFAULT_EDGE_GUARD),
            connect_divisor: param_f64(params, "connect_divisor", DEFAULT_CONNECT_DIVISOR),
            opacity_falloff: param_f64(params, "opacity_falloff", DEFAULT_OPACITY_FALLOFF),
            line_width: param_f64(params, "line_width", DEFAULT_LINE_WIDTH),
            pointer_divisor: param_f64(params, "pointer_divisor", DEFAULT_POINTER_DIVISOR),
        }
    }

    /// Like [`from_json`](Self::from_json), then [`validate`](Self::validate).
    pub fn from_json_validated(params: &Value) -> Result<Self, EngineError> {
        let p = Self::from_json(params);
        p.validate()?;
        Ok(p)
    }

    /// Rejects values outside the ranges listed in [`schema`](Self::schema),
    /// non-finite values, and an empty radius range.
    ///
    /// The lower bound on `density_area` and the upper bound on `max_radius`
    /// cap the per-frame work: particle count and circle area.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (range, value) in PARAM_RANGES.iter().zip(self.values()) {
            if !value.is_finite() || value < range.min || value > range.max {
                return Err(invalid(
                    range.name,
                    format!("must be in [{}, {}], got {value}", range.min, range.max),
                ));
            }
        }
        if self.min_radius >= self.max_radius {
            return Err(invalid(
                "min_radius",
                format!(
                    "must be below max_radius ({} >= {})",
                    self.min_radius, self.max_radius
                ),
            ));
        }
        Ok(())
    }

    /// Values in [`PARAM_RANGES`] order.
    fn values(&self) -> [f64; 10] {
        [
            self.density_area,
            self.min_radius,
            self.max_radius,
            self.max_speed,
            self.repulsion_step,
            self.edge_guard,
            self.connect_divisor,
            self.opacity_falloff,
            self.line_width,
            self.pointer_divisor,
        ]
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "density_area": self.density_area,
            "min_radius": self.min_radius,
            "max_radius": self.max_radius,
            "max_speed": self.max_speed,
            "repulsion_step": self.repulsion_step,
            "edge_guard": self.edge_guard,
            "connect_divisor": self.connect_divisor,
            "opacity_falloff": self.opacity_falloff,
            "line_width": self.line_width,
            "pointer_divisor": self.pointer_divisor,
        })
    }

    /// Schema describing every parameter: type, default, accepted range, description.
    pub fn schema() -> Value {
        let defaults = Self::default().values();
        let entries = PARAM_RANGES
            .iter()
            .zip(defaults)
            .map(|(range, default)| {
                let entry = json!({
                    "type": "number",
                    "default": default,
                    "min": range.min,
                    "max": range.max,
                    "description": range.description,
                });
                (range.name.to_string(), entry)
            })
            .collect::<serde_json::Map<_, _>>();
        Value::Object(entries)
    }
}

/// Accepted range of one parameter.
struct ParamRange {
    name: &'static str,
    min: f64,
    max: f64,
    description: &'static str,
}

/// One entry per [`FieldParams`] field, in declaration order.
const PARAM_RANGES: [ParamRange; 10] = [
    ParamRange {
        name: "density_area",
        min: 1000.0,
        max: 100000.0,
        description: "Surface area in px² per particle; count = floor(w * h / density_area)",
    },
    ParamRange {
        name: "min_radius",
        min: 0.0,
        max: 10.0,
        description: "Smallest particle radius in px",
    },
    ParamRange {
        name: "max_radius",
        min: 0.5,
        max: 20.0,
        description: "Largest particle radius in px (exclusive)",
    },
    ParamRange {
        name: "max_speed",
        min: 0.0,
        max: 5.0,
        description: "Velocity components are drawn from [-max_speed, max_speed)",
    },
    ParamRange {
        name: "repulsion_step",
        min: 0.0,
        max: 20.0,
        description: "Pixels per axis a particle is pushed away from the pointer each frame",
    },
    ParamRange {
        name: "edge_guard",
        min: 0.0,
        max: 50.0,
        description: "Radius multiple a particle must keep from an edge to be pushed toward it",
    },
    ParamRange {
        name: "connect_divisor",
        min: 1.0,
        max: 50.0,
        description: "Particles connect when d² < (w / connect_divisor) * (h / connect_divisor)",
    },
    ParamRange {
        name: "opacity_falloff",
        min: 100.0,
        max: 1000000.0,
        description: "Connection alpha is 1 - d² / opacity_falloff",
    },
    ParamRange {
        name: "line_width",
        min: 0.1,
        max: 10.0,
        description: "Connection line width in px",
    },
    ParamRange {
        name: "pointer_divisor",
        min: 1.0,
        max: 1000.0,
        description: "Pointer radius is (h / pointer_divisor) * (w / pointer_divisor)",
    },
];

fn invalid(name: &str, reason: String) -> EngineError {
    EngineError::InvalidParam {
        name: name.to_string(),
        reason,
    }
}
