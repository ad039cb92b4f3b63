use std::collections::BTreeSet;

use tracing::trace;

/// Handle for one pending frame callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequestId(pub u64);

/// The host's per-frame callback primitive.
///
/// A browser host maps this onto `requestAnimationFrame` /
/// `cancelAnimationFrame`. When the host fires a request it calls back into
/// the owner with the same id.
pub trait FrameScheduler {
    /// Schedules one callback, or `None` when frames are unavailable.
    fn request_frame(&mut self) -> Option<FrameRequestId>;

    /// Cancels a pending callback. Unknown or already fired ids are ignored.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for &mut T {
    fn request_frame(&mut self) -> Option<FrameRequestId> {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        (**self).cancel_frame(id)
    }
}

/// A self-rescheduling loop with at most one pending callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLoop {
    name: &'static str,
    pending: Option<FrameRequestId>,
}

impl FrameLoop {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            pending: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pending(&self) -> Option<FrameRequestId> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Requests a frame unless one is already pending.
    ///
    /// Returns `true` when a callback is pending afterwards.
    pub fn arm(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        if self.pending.is_none() {
            self.pending = scheduler.request_frame();
            if let Some(id) = self.pending {
                trace!(frame_loop = self.name, id = id.0, "frame requested");
            }
        }
        self.pending.is_some()
    }

    /// Cancels the pending callback, if any. Safe to call repeatedly.
    pub fn cancel(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(id) = self.pending.take() {
            trace!(frame_loop = self.name, id = id.0, "frame cancelled");
            scheduler.cancel_frame(id);
        }
    }

    /// Consumes a fired callback. Returns `false` for ids this loop does not
    /// own, such as a callback that raced with its cancellation.
    pub fn take_fired(&mut self, id: FrameRequestId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

/// Deterministic in-memory [`FrameScheduler`].
///
/// Requests stay pending until the owner drains them with
/// [`ManualScheduler::take_pending`], the way a browser fires every queued
/// animation frame callback at once.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    next_id: u64,
    pending: BTreeSet<FrameRequestId>,
    requested: u64,
    cancelled: u64,
    available: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: BTreeSet::new(),
            requested: 0,
            cancelled: 0,
            available: true,
        }
    }

    /// Scheduler that refuses every request.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn take_pending(&mut self) -> Vec<FrameRequestId> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn requested_count(&self) -> u64 {
        self.requested
    }

    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameRequestId> {
        if !self.available {
            return None;
        }
        let id = FrameRequestId(self.next_id);
        self.next_id += 1;
        self.requested += 1;
        self.pending.insert(id);
        Some(id)
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        if self.pending.remove(&id) {
            self.cancelled += 1;
        }
    }
}
