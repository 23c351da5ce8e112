//! Start/stop controller binding an [`Engine`] to a surface and a frame
//! scheduler for the lifetime of one mounted view.
//!
//! Lifecycle: `mount` → `start` → any number of `tick`s (one per fired frame,
//! each re-requesting the next) → `stop`. After `stop` the controller ignores
//! ticks and input events; `stop` itself may be called any number of times.

use glam::DVec2;
use tracing::{info, warn};

use crate::engine::Engine;
use crate::scheduler::{FrameScheduler, ManualScheduler};
use crate::surface::Surface;
use crate::theme::DisplayMode;

/// Where the frame loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Mounted, no frame requested yet.
    Idle,
    /// A frame is (or will be) requested after every tick.
    Running,
    /// Torn down; nothing runs any more.
    Stopped,
}

/// Owns the engine, the surface and the scheduler of one mounted view.
pub struct Animation<E, S, F: FrameScheduler> {
    engine: E,
    surface: S,
    scheduler: F,
    mode: DisplayMode,
    state: LoopState,
    pending: Option<F::Handle>,
}

impl<E: Engine, S: Surface, F: FrameScheduler> Animation<E, S, F> {
    /// Binds the parts together. Without a surface there is nothing to draw on:
    /// the mount attempt is abandoned and `None` returned.
    pub fn mount(engine: E, surface: Option<S>, scheduler: F, mode: DisplayMode) -> Option<Self> {
        let Some(surface) = surface else {
            warn!("no drawing surface available; particle animation not started");
            return None;
        };
        Some(Self {
            engine,
            surface,
            scheduler,
            mode,
            state: LoopState::Idle,
            pending: None,
        })
    }

    /// Requests the first frame. Only effective once, from `Idle`.
    pub fn start(&mut self) {
        if self.state != LoopState::Idle {
            return;
        }
        self.state = LoopState::Running;
        self.pending = self.scheduler.request_frame();
        info!(mode = %self.mode, "particle animation started");
    }

    /// Runs one frame: re-request, clear, advance and draw.
    ///
    /// Returns `false` without touching anything when the loop is not running.
    pub fn tick(&mut self) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.pending = self.scheduler.request_frame();
        self.surface.clear();
        self.engine.frame(&mut self.surface, self.mode);
        true
    }

    /// Cancels the outstanding frame and stops reacting to input. Idempotent.
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.state = LoopState::Stopped;
        info!("particle animation stopped");
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if self.accepts_input() {
            self.engine.pointer_moved(DVec2::new(x, y));
        }
    }

    pub fn pointer_left(&mut self) {
        if self.accepts_input() {
            self.engine.pointer_left();
        }
    }

    /// Resizes the surface, then lets the engine re-seed for the new size.
    pub fn resized(&mut self, width: u32, height: u32) {
        if self.accepts_input() {
            self.surface.resize(width, height);
            self.engine.resize(width as f64, height as f64);
        }
    }

    /// Switches palettes from the next frame on. Physics is unaffected.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    /// Stops the loop and hands back the engine and surface.
    pub fn into_parts(mut self) -> (E, S) {
        self.stop();
        (self.engine, self.surface)
    }

    /// Input is only forwarded while the loop runs; before `start` and after
    /// `stop` the engine is left alone.
    fn accepts_input(&self) -> bool {
        self.state == LoopState::Running
    }
}

impl<E: Engine, S: Surface> Animation<E, S, ManualScheduler> {
    /// Fires up to `frames` scheduled frames back to back and returns how many ran.
    pub fn pump(&mut self, frames: usize) -> usize {
        let mut ran = 0;
        while ran < frames && self.scheduler.fire() {
            if !self.tick() {
                break;
            }
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::params::FieldParams;
    use crate::surface::{DrawCommand, Recorder};

    type TestAnimation = Animation<Field, Recorder, ManualScheduler>;

    fn mounted(mode: DisplayMode) -> TestAnimation {
        let field = Field::new(900.0, 900.0, 42, FieldParams::default());
        Animation::mount(field, Some(Recorder::new()), ManualScheduler::new(), mode).unwrap()
    }

    #[test]
    fn mount_without_surface_never_starts() {
        let field = Field::new(900.0, 900.0, 42, FieldParams::default());
        let anim: Option<TestAnimation> =
            Animation::mount(field, None, ManualScheduler::new(), DisplayMode::Dark);
        assert!(anim.is_none());
    }

    #[test]
    fn mount_is_idle_until_started() {
        let mut anim = mounted(DisplayMode::Dark);
        assert_eq!(anim.state(), LoopState::Idle);
        assert!(!anim.tick());
        assert_eq!(anim.scheduler().requested(), 0);
        assert!(anim.surface().commands().is_empty());
    }

    #[test]
    fn start_requests_first_frame_once() {
        let mut anim = mounted(DisplayMode::Dark);
        anim.start();
        anim.start();
        assert!(anim.is_running());
        assert_eq!(anim.scheduler().requested(), 1);
        assert!(anim.scheduler().pending().is_some());
    }

    #[test]
    fn first_draw_waits_for_the_first_scheduled_frame() {
        let mut anim = mounted(DisplayMode::Dark);
        anim.start();
        assert!(anim.surface().commands().is_empty());
        assert_eq!(anim.engine().frames(), 0);

        assert_eq!(anim.pump(1), 1);
        assert_eq!(anim.engine().frames(), 1);
        assert_eq!(anim.surface().circles().count(), 90);
    }

    #[test]
    fn each_tick_reschedules_clears_and_draws() {
        let mut anim = mounted(DisplayMode::Dark);
        anim.start();
        assert_eq!(anim.pump(3), 3);
        assert_eq!(anim.scheduler().requested(), 4);
        assert_eq!(anim.engine().frames(), 3);
        let clears = anim
            .surface()
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear))
            .count();
        assert_eq!(clears, 3);
        assert_eq!(anim.surface().commands()[0], DrawCommand::Clear);
    }

    #[test]
    fn teardown_then_tick_draws_and_mutates_nothing() {
        let mut anim = mounted(DisplayMode::Dark);
        anim.start();
        anim.pump(2);
        anim.stop();
        assert_eq!(anim.scheduler().pending(), None);

        let particles = anim.engine().particles().to_vec();
        let commands = anim.surface().commands().len();
        assert!(!anim.tick());
        anim.pointer_moved(450.0, 450.0);
        anim.resized(100, 100);
        assert_eq!(anim.pump(5), 0);

        assert_eq!(anim.engine().particles(), particles.as_slice());
        assert_eq!(anim.engine().frames(), 2);
        assert_eq!(anim.surface().commands().len(), commands);
        assert!(!anim.engine().pointer().is_present());
    }

    #[test]
    fn teardown_is_idempotent() {
        let mut anim = mounted(DisplayMode::Dark);
        anim.start();
        anim.stop();
        anim.stop();
        anim.stop();
        assert_eq!(anim.state(), LoopState::Stopped);
        assert_eq!(anim.scheduler().cancelled().len(), 1);
    }

    #[test]
    fn stop_before_start_prevents_later_start() {
        let mut anim = mounted(DisplayMode::Dark);
        anim.stop();
        anim.start();
        assert_eq!(anim.state(), LoopState::Stopped);
        assert_eq!(anim.scheduler().requested(), 0);
    }

    #[test]
    fn resize_resizes_surface_and_reseeds() {
        let mut anim = mounted(DisplayMode::Dark);
        anim.start();
        anim.resized(1800, 900);
        assert_eq!(
            anim.surface().commands().last(),
            Some(&DrawCommand::Resize {
                width: 1800,
                height: 900
            })
        );
        assert_eq!(anim.engine().particle_count(), 180);
    }

    #[test]
    fn input_before_start_is_ignored() {
        let mut anim = mounted(DisplayMode::Dark);
        let particles = anim.engine().particles().to_vec();
        anim.pointer_moved(12.0, 34.0);
        anim.resized(1800, 900);

        assert!(!anim.engine().pointer().is_present());
        assert_eq!(anim.engine().particles(), particles.as_slice());
        assert!(anim.surface().commands().is_empty());
    }

    #[test]
    fn pointer_events_reach_the_field() {
        let mut anim = mounted(DisplayMode::Dark);
        anim.start();
        anim.pointer_moved(12.0, 34.0);
        assert_eq!(anim.engine().pointer().position(), Some(DVec2::new(12.0, 34.0)));
        anim.pointer_left();
        assert_eq!(anim.engine().pointer().position(), None);
    }

    #[test]
    fn display_mode_switch_recolors_without_touching_physics() {
        let mut a = mounted(DisplayMode::Dark);
        let mut b = mounted(DisplayMode::Dark);
        a.start();
        b.start();
        a.pump(1);
        b.pump(1);
        b.set_display_mode(DisplayMode::Light);
        a.pump(1);
        b.pump(1);

        assert_eq!(a.engine().particles(), b.engine().particles());
        let last_circle = |anim: &TestAnimation| match anim.surface().circles().last() {
            Some(DrawCommand::Circle { color, .. }) => *color,
            _ => panic!("no circle drawn"),
        };
        assert_eq!(last_circle(&a), DisplayMode::Dark.theme().particle);
        assert_eq!(last_circle(&b), DisplayMode::Light.theme().particle);
    }

    #[test]
    fn into_parts_stops_the_loop() {
        let mut anim = mounted(DisplayMode::Light);
        anim.start();
        let (field, recorder) = anim.into_parts();
        assert_eq!(field.frames(), 0);
        assert!(recorder.commands().is_empty());
    }

    #[test]
    fn boxed_engine_can_be_driven() {
        let field: Box<dyn Engine> = Box::new(Field::new(300.0, 300.0, 1, FieldParams::default()));
        let mut anim =
            Animation::mount(field, Some(Recorder::new()), ManualScheduler::new(), DisplayMode::Dark)
                .unwrap();
        anim.start();
        assert_eq!(anim.pump(2), 2);
        assert_eq!(anim.surface().circles().count(), 2 * 10);
    }
}
