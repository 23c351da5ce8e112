#![deny(unsafe_code)]
//! Browser host for the particle-field backdrop.
//!
//! [`ParticleBackground::mount`] takes a `<canvas>`, sizes it to the window,
//! and runs the field on `requestAnimationFrame`, listening to `mousemove`,
//! `mouseout` and `resize` on the window. [`ParticleBackground::unmount`]
//! (also run on drop, i.e. `free()` from JS) cancels the pending frame and
//! removes every listener.
//!
//! The animation lives in an `Rc<RefCell<_>>` owned by the handle; the frame
//! and listener closures only hold `Weak` references to it, so a frame that
//! fires after unmount finds nothing to run.

mod canvas;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use particle_field_core::{
    Animation, DisplayMode, Field, FieldParams, FrameScheduler, Surface,
};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, MouseEvent, Window};

pub use canvas::CanvasSurface;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type BackdropAnimation = Animation<Field, CanvasSurface, AnimationFrameScheduler>;
type SharedAnimation = Rc<RefCell<BackdropAnimation>>;

/// `requestAnimationFrame`-backed scheduler. Requests re-use the single frame
/// closure held in `callback`.
pub struct AnimationFrameScheduler {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for AnimationFrameScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let callback = self.callback.borrow();
        let f = callback.as_ref()?;
        self.window
            .request_animation_frame(f.as_ref().unchecked_ref())
            .ok()
    }

    fn cancel_frame(&mut self, handle: i32) {
        if self.window.cancel_animation_frame(handle).is_err() {
            warn!(handle, "cancelAnimationFrame failed");
        }
    }
}

/// Everything that has to be released on unmount.
struct Mounted {
    window: Window,
    animation: SharedAnimation,
    frame: FrameCallback,
    on_move: Closure<dyn FnMut(MouseEvent)>,
    on_leave: Closure<dyn FnMut(MouseEvent)>,
    on_resize: Closure<dyn FnMut(Event)>,
}

impl Mounted {
    fn listeners(&self) -> [(&'static str, &js_sys::Function); 3] {
        [
            ("mousemove", self.on_move.as_ref().unchecked_ref()),
            ("mouseout", self.on_leave.as_ref().unchecked_ref()),
            ("resize", self.on_resize.as_ref().unchecked_ref()),
        ]
    }
}

/// A particle backdrop mounted on one canvas.
#[wasm_bindgen]
pub struct ParticleBackground {
    inner: Option<Mounted>,
}

#[wasm_bindgen]
impl ParticleBackground {
    /// Mounts the backdrop and starts its frame loop.
    ///
    /// `mode` is `"light"` or `"dark"` (anything else falls back to dark).
    /// Without a window or a 2D context the handle is inert: the loop never
    /// starts and no listener is registered.
    #[wasm_bindgen(constructor)]
    pub fn mount(
        canvas: HtmlCanvasElement,
        mode: &str,
        seed: f64,
    ) -> Result<ParticleBackground, JsValue> {
        let inert = ParticleBackground { inner: None };
        let Some(window) = web_sys::window() else {
            warn!("no window; particle backdrop not mounted");
            return Ok(inert);
        };
        let mode = mode.parse::<DisplayMode>().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to the default display mode");
            DisplayMode::default()
        });

        let (width, height) = viewport_size(&window);
        let surface = CanvasSurface::from_canvas(canvas).map(|mut surface| {
            surface.resize(width, height);
            surface
        });
        let field = Field::new(
            width as f64,
            height as f64,
            seed_from_js(seed),
            FieldParams::default(),
        );
        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = AnimationFrameScheduler {
            window: window.clone(),
            callback: Rc::clone(&frame),
        };
        let Some(animation) = Animation::mount(field, surface, scheduler, mode) else {
            return Ok(inert);
        };
        let animation: SharedAnimation = Rc::new(RefCell::new(animation));

        let weak = Rc::downgrade(&animation);
        *frame.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            with_animation(&weak, |a| {
                a.tick();
            });
        }));

        let weak = Rc::downgrade(&animation);
        let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            with_animation(&weak, |a| {
                a.pointer_moved(event.client_x() as f64, event.client_y() as f64)
            });
        });

        let weak = Rc::downgrade(&animation);
        let on_leave = Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
            with_animation(&weak, |a| a.pointer_left());
        });

        let weak = Rc::downgrade(&animation);
        let resize_window = window.clone();
        let on_resize = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let (w, h) = viewport_size(&resize_window);
            with_animation(&weak, |a| a.resized(w, h));
        });

        // Dropping the handle on a failed registration unmounts what was added.
        let handle = ParticleBackground {
            inner: Some(Mounted {
                window,
                animation,
                frame,
                on_move,
                on_leave,
                on_resize,
            }),
        };
        if let Some(mounted) = &handle.inner {
            for (kind, listener) in mounted.listeners() {
                mounted
                    .window
                    .add_event_listener_with_callback(kind, listener)?;
            }
            mounted.animation.borrow_mut().start();
        }
        Ok(handle)
    }

    /// Switches the palette; the physics carries on untouched.
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = mode
            .parse::<DisplayMode>()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        if let Some(m) = &self.inner {
            m.animation.borrow_mut().set_display_mode(mode);
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.inner
            .as_ref()
            .map_or(0, |m| m.animation.borrow().engine().particle_count())
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|m| m.animation.borrow().is_running())
    }

    /// Cancels the pending frame and removes the listeners. Safe to call twice.
    pub fn unmount(&mut self) {
        let Some(mounted) = self.inner.take() else {
            return;
        };
        mounted.animation.borrow_mut().stop();
        for (kind, listener) in mounted.listeners() {
            if mounted
                .window
                .remove_event_listener_with_callback(kind, listener)
                .is_err()
            {
                warn!(kind, "failed to remove listener");
            }
        }
        mounted.frame.borrow_mut().take();
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Runs `f` on the animation if it is still alive and not already borrowed.
fn with_animation<F>(weak: &Weak<RefCell<BackdropAnimation>>, f: F)
where
    F: FnOnce(&mut BackdropAnimation),
{
    if let Some(animation) = weak.upgrade() {
        if let Ok(mut a) = animation.try_borrow_mut() {
            f(&mut a);
        }
    }
}

/// Window inner size in whole pixels; 0 when unavailable.
fn viewport_size(window: &Window) -> (u32, u32) {
    let dim = |v: Result<JsValue, JsValue>| to_pixels(v.ok().and_then(|v| v.as_f64()));
    (dim(window.inner_width()), dim(window.inner_height()))
}

fn to_pixels(v: Option<f64>) -> u32 {
    match v {
        Some(v) if v.is_finite() && v > 0.0 => v.min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

/// JS numbers are f64; negative, fractional and non-finite seeds are folded
/// into a u64.
fn seed_from_js(seed: f64) -> u64 {
    if seed.is_finite() {
        seed.abs().trunc() as u64
    } else {
        0
    }
}
