#![deny(unsafe_code)]
//! Core of the particle-field backdrop.
//!
//! A [`Field`] of drifting [`Particle`]s, pushed away from the [`Pointer`] and
//! joined by fading lines when close, drawn each frame onto a [`Surface`]. The
//! [`Animation`] controller runs the frame loop over a host's
//! [`FrameScheduler`] from mount to teardown. Colors follow the host's
//! [`DisplayMode`]; nothing else does.

pub mod animation;
pub mod color;
pub mod engine;
pub mod error;
pub mod field;
pub mod params;
pub mod particle;
pub mod pointer;
pub mod prng;
pub mod scheduler;
pub mod seed;
pub mod surface;
pub mod theme;

pub use animation::{Animation, LoopState};
pub use color::{Rgba, Srgb};
pub use engine::Engine;
pub use error::EngineError;
pub use field::{Connection, Field};
pub use glam::DVec2;
pub use params::FieldParams;
pub use particle::Particle;
pub use pointer::Pointer;
pub use prng::Xorshift64;
pub use scheduler::{FrameId, FrameScheduler, ManualScheduler};
pub use seed::Seed;
pub use surface::{DrawCommand, Recorder, Surface};
pub use theme::{DisplayMode, Theme};
