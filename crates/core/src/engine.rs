//! The `Engine` trait the animation controller drives.
//!
//! The trait is object-safe so a host can hold `Box<dyn Engine>` and swap the
//! backdrop implementation at runtime.

use glam::DVec2;
use serde_json::Value;

use crate::surface::Surface;
use crate::theme::DisplayMode;

/// A frame-driven animation that draws onto a [`Surface`].
///
/// All operations are infallible: inputs come from a trusted host, and a
/// missing pointer simply means no interaction.
pub trait Engine {
    /// Advances one frame and draws it. The caller has already cleared the
    /// surface.
    fn frame(&mut self, surface: &mut dyn Surface, mode: DisplayMode);

    /// The surface was resized to `width` × `height` pixels.
    fn resize(&mut self, width: f64, height: f64);

    /// The pointer moved to `position` (surface pixels).
    fn pointer_moved(&mut self, position: DVec2);

    /// The pointer left the surface.
    fn pointer_left(&mut self);

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn frame(&mut self, surface: &mut dyn Surface, mode: DisplayMode) {
        (**self).frame(surface, mode);
    }

    fn resize(&mut self, width: f64, height: f64) {
        (**self).resize(width, height);
    }

    fn pointer_moved(&mut self, position: DVec2) {
        (**self).pointer_moved(position);
    }

    fn pointer_left(&mut self) {
        (**self).pointer_left();
    }

    fn params(&self) -> Value {
        (**self).params()
    }

    fn param_schema(&self) -> Value {
        (**self).param_schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Recorder;
    use serde_json::json;

    /// Counts calls; draws one circle per frame at the pointer, if any.
    struct MockEngine {
        frames: usize,
        pointer: Option<DVec2>,
        size: (f64, f64),
    }

    impl MockEngine {
        fn new() -> Self {
            Self {
                frames: 0,
                pointer: None,
                size: (0.0, 0.0),
            }
        }
    }

    impl Engine for MockEngine {
        fn frame(&mut self, surface: &mut dyn Surface, mode: DisplayMode) {
            self.frames += 1;
            if let Some(at) = self.pointer {
                surface.fill_circle(at, 1.0, mode.theme().particle);
            }
        }

        fn resize(&mut self, width: f64, height: f64) {
            self.size = (width, height);
        }

        fn pointer_moved(&mut self, position: DVec2) {
            self.pointer = Some(position);
        }

        fn pointer_left(&mut self) {
            self.pointer = None;
        }

        fn params(&self) -> Value {
            json!({"frames": self.frames})
        }

        fn param_schema(&self) -> Value {
            json!({"frames": {"type": "integer", "default": 0}})
        }
    }

    #[test]
    fn engine_trait_is_object_safe() {
        let mut engine: Box<dyn Engine> = Box::new(MockEngine::new());
        let mut rec = Recorder::new();
        engine.pointer_moved(DVec2::new(2.0, 3.0));
        engine.frame(&mut rec, DisplayMode::Dark);
        assert_eq!(rec.draw_count(), 1);
        assert_eq!(engine.params()["frames"], 1);
    }

    #[test]
    fn dyn_engine_mut_reference_forwards_inputs() {
        let mut engine = MockEngine::new();
        {
            let e: &mut dyn Engine = &mut engine;
            e.resize(640.0, 480.0);
            e.pointer_moved(DVec2::ONE);
            e.pointer_left();
        }
        assert_eq!(engine.size, (640.0, 480.0));
        assert_eq!(engine.pointer, None);
        assert_eq!(engine.param_schema()["frames"]["type"], "integer");
    }
}
