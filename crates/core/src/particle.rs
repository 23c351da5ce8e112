//! A single drifting point and its per-frame update step.

use glam::DVec2;

use crate::params::FieldParams;
use crate::pointer::Pointer;
use crate::prng::Xorshift64;
use crate::surface::Surface;
use crate::theme::Theme;

/// A simulated point: position, constant-magnitude velocity, fixed radius.
///
/// Particles carry no color; [`draw`](Particle::draw) takes it from the theme
/// on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
}

impl Particle {
    pub fn new(position: DVec2, velocity: DVec2, radius: f64) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Draws a particle for a `width` × `height` surface.
    ///
    /// Radius in `[min_radius, max_radius)`, position inset by twice the radius
    /// from every edge, velocity components in `[-max_speed, max_speed)`.
    pub fn random(rng: &mut Xorshift64, width: f64, height: f64, params: &FieldParams) -> Self {
        let radius = rng.next_range(params.min_radius, params.max_radius);
        let inset = radius * 2.0;
        let x = rng.next_range(inset, width - inset);
        let y = rng.next_range(inset, height - inset);
        let dx = rng.next_range(-params.max_speed, params.max_speed);
        let dy = rng.next_range(-params.max_speed, params.max_speed);
        Self::new(DVec2::new(x, y), DVec2::new(dx, dy), radius)
    }

    /// Advances the particle one frame: bounce, pointer repulsion, then drift.
    pub fn update(&mut self, bounds: DVec2, pointer: &Pointer, params: &FieldParams) {
        self.bounce(bounds);
        if let Some(at) = pointer.position() {
            self.repel(at, pointer.radius(), bounds, params);
        }
        self.position += self.velocity;
    }

    /// Reverses each velocity component whose coordinate is outside `[0, bound]`.
    /// The axes are checked independently.
    fn bounce(&mut self, bounds: DVec2) {
        if self.position.x > bounds.x || self.position.x < 0.0 {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y > bounds.y || self.position.y < 0.0 {
            self.velocity.y = -self.velocity.y;
        }
    }

    /// Pushes the particle `repulsion_step` pixels away from the pointer on each
    /// axis, unless that would move it toward an edge it is already within
    /// `edge_guard * radius` of. The guard measures from the current position,
    /// not the destination.
    fn repel(&mut self, pointer: DVec2, pointer_radius: f64, bounds: DVec2, params: &FieldParams) {
        let distance = pointer.distance(self.position);
        if distance >= pointer_radius + self.radius {
            return;
        }

        let step = params.repulsion_step;
        let guard = self.radius * params.edge_guard;
        let p = &mut self.position;

        if pointer.x < p.x && p.x < bounds.x - guard {
            p.x += step;
        }
        if pointer.x > p.x && p.x > guard {
            p.x -= step;
        }
        if pointer.y < p.y && p.y < bounds.y - guard {
            p.y += step;
        }
        if pointer.y > p.y && p.y > guard {
            p.y -= step;
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, theme: &Theme) {
        surface.fill_circle(self.position, self.radius, theme.particle);
    }
}
