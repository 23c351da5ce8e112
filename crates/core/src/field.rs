//! The particle field: every particle of one mounted view, the surface size
//! they live in, and the pointer they react to.
//!
//! Each frame moves and draws particles one at a time, in collection order,
//! then runs a single connection pass over the moved particles. The connection
//! pass strokes a line between every pair whose squared distance is below
//! `(width / 7) * (height / 7)`, fading with `1 - d² / 20000`. The sweep runs
//! `b` from `a` rather than `a + 1`, so each particle is also paired with
//! itself and contributes one zero-length, fully opaque stroke.
//!
//! Resizing never moves particles: it throws the collection away and seeds a
//! fresh one sized for the new area.

use glam::DVec2;
use serde_json::Value;
use tracing::{debug, trace};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::params::FieldParams;
use crate::particle::Particle;
use crate::pointer::Pointer;
use crate::prng::Xorshift64;
use crate::surface::Surface;
use crate::theme::{DisplayMode, Theme};

/// A pair of particles close enough to be joined by a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Index of the first particle.
    pub a: usize,
    /// Index of the second particle; `b >= a`.
    pub b: usize,
    /// Squared distance between the two.
    pub distance_sq: f64,
    /// `1 - distance_sq / opacity_falloff`, unclamped.
    pub opacity: f64,
}

/// Simulation state for one mounted view.
#[derive(Debug, Clone)]
pub struct Field {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    pointer: Pointer,
    params: FieldParams,
    rng: Xorshift64,
    frames: u64,
}

impl Field {
    /// Creates a field for a `width` × `height` surface and seeds its particles.
    ///
    /// Dimensions are trusted: zero or negative sizes simply yield no particles.
    pub fn new(width: f64, height: f64, seed: u64, params: FieldParams) -> Self {
        let mut field = Self {
            width,
            height,
            particles: Vec::new(),
            pointer: Pointer::for_surface(width, height, params.pointer_divisor),
            params,
            rng: Xorshift64::new(seed),
            frames: 0,
        };
        field.init();
        field
    }

    /// Creates a field from a JSON params object, falling back to defaults for
    /// missing keys and rejecting invalid values.
    pub fn from_json(
        width: f64,
        height: f64,
        seed: u64,
        json_params: &Value,
    ) -> Result<Self, EngineError> {
        Ok(Self::new(
            width,
            height,
            seed,
            FieldParams::from_json_validated(json_params)?,
        ))
    }

    /// `floor(width * height / density_area)`; 0 for empty or negative areas.
    pub fn particle_count_for(width: f64, height: f64, density_area: f64) -> usize {
        // `as` saturates: negative and NaN become 0.
        (width * height / density_area).floor() as usize
    }

    /// Replaces the whole particle collection with a fresh random one.
    pub fn init(&mut self) {
        let count = Self::particle_count_for(self.width, self.height, self.params.density_area);
        let (w, h) = (self.width, self.height);
        let params = self.params;
        let rng = &mut self.rng;
        self.particles = (0..count)
            .map(|_| Particle::random(rng, w, h, &params))
            .collect();
        debug!(count, width = w, height = h, "seeded particle field");
    }

    /// Adopts new surface dimensions, recomputes the pointer radius, and
    /// re-seeds every particle.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.pointer
            .resize(width, height, self.params.pointer_divisor);
        self.init();
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn bounds(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Replaces the particle collection verbatim. Hosts use this to restore a
    /// recorded layout; the field does not check the particles against its bounds.
    pub fn replace_particles(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut Pointer {
        &mut self.pointer
    }

    pub fn field_params(&self) -> &FieldParams {
        &self.params
    }

    /// Frames advanced since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Squared-distance threshold below which two particles connect.
    pub fn connection_threshold(&self) -> f64 {
        let d = self.params.connect_divisor;
        (self.width / d) * (self.height / d)
    }

    /// Moves every particle one frame without drawing anything.
    pub fn step(&mut self) {
        let bounds = self.bounds();
        for particle in &mut self.particles {
            particle.update(bounds, &self.pointer, &self.params);
        }
        self.frames += 1;
    }

    /// One frame: update and draw each particle in turn, then connect.
    pub fn animate(&mut self, surface: &mut dyn Surface, theme: &Theme) {
        let bounds = self.bounds();
        for particle in &mut self.particles {
            particle.update(bounds, &self.pointer, &self.params);
            particle.draw(surface, theme);
        }
        self.connect(surface, theme);
        self.frames += 1;
        trace!(frame = self.frames, particles = self.particles.len(), "frame drawn");
    }

    /// Every connected pair, self-pairs included. O(n²).
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        let threshold = self.connection_threshold();
        let falloff = self.params.opacity_falloff;
        let particles = &self.particles;
        (0..particles.len()).flat_map(move |a| {
            (a..particles.len()).filter_map(move |b| {
                let distance_sq = particles[a].position.distance_squared(particles[b].position);
                (distance_sq < threshold).then(|| Connection {
                    a,
                    b,
                    distance_sq,
                    opacity: 1.0 - distance_sq / falloff,
                })
            })
        })
    }

    /// Strokes a line for every connection, in the line color of `theme`.
    pub fn connect(&self, surface: &mut dyn Surface, theme: &Theme) {
        for c in self.connections() {
            surface.stroke_line(
                self.particles[c.a].position,
                self.particles[c.b].position,
                self.params.line_width,
                theme.line_at(c.opacity),
            );
        }
    }
}

impl Engine for Field {
    fn frame(&mut self, surface: &mut dyn Surface, mode: DisplayMode) {
        self.animate(surface, &mode.theme());
    }

    fn resize(&mut self, width: f64, height: f64) {
        Field::resize(self, width, height);
    }

    fn pointer_moved(&mut self, position: DVec2) {
        self.pointer.move_to(position);
    }

    fn pointer_left(&mut self) {
        self.pointer.leave();
    }

    fn params(&self) -> Value {
        self.params.to_json()
    }

    fn param_schema(&self) -> Value {
        FieldParams::schema()
    }
}
