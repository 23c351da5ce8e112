//! The drawing target the field renders onto.
//!
//! A [`Surface`] is whatever the host draws with: a browser 2D context, a CPU
//! pixel buffer, or the [`Recorder`] used by tests. The trait is object-safe so
//! engines can draw through `&mut dyn Surface`.

use glam::DVec2;

use crate::color::Rgba;

/// Immediate-mode 2D drawing target.
pub trait Surface {
    /// Resizes the backing store to `width` × `height` pixels. Contents are
    /// undefined afterwards; the next frame clears them anyway.
    fn resize(&mut self, width: u32, height: u32);

    /// Clears the whole surface to transparent.
    fn clear(&mut self);

    /// Fills a circle of `radius` centered on `center`.
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba);

    /// Strokes a straight line of `width` pixels from `from` to `to`.
    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba);
}

/// One call made on a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize {
        width: u32,
        height: u32,
    },
    Clear,
    Circle {
        center: DVec2,
        radius: f64,
        color: Rgba,
    },
    Line {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Rgba,
    },
}

/// A surface that records every call instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    /// Number of circle and line commands (clears and resizes excluded).
    pub fn draw_count(&self) -> usize {
        self.circles().count() + self.lines().count()
    }
}

impl Surface for Recorder {
    fn resize(&mut self, width: u32, height: u32) {
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_trait_is_object_safe() {
        let mut rec = Recorder::new();
        let surface: &mut dyn Surface = &mut rec;
        surface.clear();
        surface.fill_circle(DVec2::new(1.0, 2.0), 3.0, Rgba::new(1, 2, 3, 0.5));
        assert_eq!(rec.commands().len(), 2);
    }

    #[test]
    fn recorder_keeps_call_order() {
        let mut rec = Recorder::new();
        rec.resize(10, 20);
        rec.clear();
        rec.stroke_line(DVec2::ZERO, DVec2::ONE, 1.0, Rgba::new(0, 0, 0, 1.0));
        assert_eq!(rec.commands()[0], DrawCommand::Resize { width: 10, height: 20 });
        assert_eq!(rec.commands()[1], DrawCommand::Clear);
        assert!(matches!(rec.commands()[2], DrawCommand::Line { .. }));
    }

    #[test]
    fn draw_count_ignores_clear_and_resize() {
        let mut rec = Recorder::new();
        rec.resize(4, 4);
        rec.clear();
        rec.fill_circle(DVec2::ZERO, 1.0, Rgba::new(0, 0, 0, 1.0));
        rec.stroke_line(DVec2::ZERO, DVec2::X, 1.0, Rgba::new(0, 0, 0, 1.0));
        assert_eq!(rec.draw_count(), 2);
        assert_eq!(rec.circles().count(), 1);
        assert_eq!(rec.lines().count(), 1);
    }

    #[test]
    fn take_empties_the_recorder() {
        let mut rec = Recorder::new();
        rec.clear();
        assert_eq!(rec.take(), vec![DrawCommand::Clear]);
        assert!(rec.commands().is_empty());
    }
}
