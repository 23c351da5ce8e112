//! The host's "call me on the next frame" capability.
//!
//! In a browser this is `requestAnimationFrame`/`cancelAnimationFrame`; a
//! headless host uses [`ManualScheduler`] and fires frames itself.

use std::fmt;

/// Requests and cancels next-frame callbacks.
pub trait FrameScheduler {
    /// Identifies one outstanding request.
    type Handle: Copy + fmt::Debug;

    /// Asks the host to run the frame callback once more. `None` when the host
    /// refused; the loop then stops advancing.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    /// Withdraws a request made by [`request_frame`](Self::request_frame).
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Handle issued by [`ManualScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// A scheduler whose frames are fired explicitly by the caller.
///
/// At most one request is outstanding; a new request replaces it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<FrameId>,
    cancelled: Vec<FrameId>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The request waiting to be fired, if any.
    pub fn pending(&self) -> Option<FrameId> {
        self.pending
    }

    /// Consumes the outstanding request, as a host does right before invoking
    /// the callback. Returns `false` when nothing was requested.
    pub fn fire(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Total requests issued.
    pub fn requested(&self) -> u64 {
        self.next_id
    }

    /// Every handle passed to [`cancel_frame`](FrameScheduler::cancel_frame).
    pub fn cancelled(&self) -> &[FrameId] {
        &self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = FrameId;

    fn request_frame(&mut self) -> Option<FrameId> {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.pending = Some(id);
        Some(id)
    }

    fn cancel_frame(&mut self, handle: FrameId) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}
