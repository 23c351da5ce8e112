#![deny(unsafe_code)]
//! CPU rendering of the particle field.
//!
//! [`Pixmap`] is a [`Surface`](particle_field_core::Surface) backed by an RGBA
//! buffer; [`render`] drives a whole offline session from a
//! [`Seed`](particle_field_core::Seed) with a manually pumped frame loop. PNG
//! output lives in [`snapshot`] behind the `png` feature.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::Pixmap;

use particle_field_core::{Animation, EngineError, Field, ManualScheduler, Seed};
use tracing::debug;

/// Result of an offline render.
pub struct Rendered {
    /// Last frame drawn.
    pub pixmap: Pixmap,
    /// Simulation state after the last frame.
    pub field: Field,
    /// Frames actually run.
    pub frames: usize,
}

/// Runs `seed.frames` frames headless and returns the final frame.
///
/// The pointer, if the seed has one, is held in place for every frame.
pub fn render(seed: &Seed) -> Result<Rendered, EngineError> {
    seed.validate()?;
    let field = Field::from_json(seed.width as f64, seed.height as f64, seed.seed, &seed.params)?;
    let pixmap = Pixmap::new(seed.width, seed.height);
    let mut anim = Animation::mount(field, Some(pixmap), ManualScheduler::new(), seed.mode)
        .ok_or_else(|| EngineError::Io("no drawing surface".into()))?;

    anim.start();
    if let Some([x, y]) = seed.pointer {
        anim.pointer_moved(x, y);
    }
    let frames = anim.pump(seed.frames);
    let (field, pixmap) = anim.into_parts();
    debug!(frames, particles = field.particle_count(), "offline render finished");

    Ok(Rendered {
        pixmap,
        field,
        frames,
    })
}
