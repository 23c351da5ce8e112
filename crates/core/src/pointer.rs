//! Pointer state observed by the field.

use glam::DVec2;

/// Last known pointer position and the radius inside which particles are
/// pushed away.
///
/// The position is `None` before the first move and after the pointer leaves
/// the surface; an absent pointer repels nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    position: Option<DVec2>,
    radius: f64,
}

impl Pointer {
    /// An absent pointer with the radius derived from the surface size:
    /// `(height / divisor) * (width / divisor)`.
    pub fn for_surface(width: f64, height: f64, divisor: f64) -> Self {
        Self {
            position: None,
            radius: Self::radius_for(width, height, divisor),
        }
    }

    pub fn radius_for(width: f64, height: f64, divisor: f64) -> f64 {
        (height / divisor) * (width / divisor)
    }

    pub fn position(&self) -> Option<DVec2> {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_present(&self) -> bool {
        self.position.is_some()
    }

    /// Last write wins.
    pub fn move_to(&mut self, position: DVec2) {
        self.position = Some(position);
    }

    pub fn leave(&mut self) {
        self.position = None;
    }

    /// Recomputes the radius for a resized surface; the position is kept.
    pub fn resize(&mut self, width: f64, height: f64, divisor: f64) {
        self.radius = Self::radius_for(width, height, divisor);
    }
}
