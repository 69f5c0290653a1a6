//! Per-frame callback scheduling.
//!
//! `FrameScheduler` is the host's "call me on the next frame" API. `FrameClock`
//! is a manual implementation driven by whoever owns the render loop, and
//! `FrameLoop` turns one-shot callbacks into a repeating task that re-arms
//! itself every frame until cancelled.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

/// Receives the frame timestamp in nanoseconds
pub type FrameCallback = Box<dyn FnOnce(u64)>;

pub trait FrameScheduler {
    /// Runs `callback` once on the next frame
    fn schedule(&self, callback: FrameCallback) -> FrameHandle;

    /// Drops a pending callback. Returns `false` if it already ran or was
    /// already cancelled.
    fn cancel(&self, handle: FrameHandle) -> bool;
}

/// Frame scheduler advanced explicitly with [`FrameClock::run_frame`]
#[derive(Default)]
pub struct FrameClock {
    next_handle: Cell<u64>,
    pending: RefCell<Vec<(FrameHandle, FrameCallback)>>,
    frames: Cell<u64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every callback that was pending when the frame started.
    /// Callbacks scheduled while the frame runs wait for the next one.
    pub fn run_frame(&self, frame_time_nanos: u64) -> usize {
        let due: Vec<FrameHandle> = self.pending.borrow().iter().map(|(h, _)| *h).collect();
        let mut ran = 0;
        for handle in due {
            // Taken one at a time so a callback can cancel a later one in the same frame
            let callback = {
                let mut pending = self.pending.borrow_mut();
                pending
                    .iter()
                    .position(|(h, _)| *h == handle)
                    .map(|i| pending.remove(i).1)
            };
            if let Some(callback) = callback {
                callback(frame_time_nanos);
                ran += 1;
            }
        }
        self.frames.set(self.frames.get() + 1);
        trace!(frame = self.frames.get(), ran, "frame");
        ran
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Number of frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frames.get()
    }
}

impl FrameScheduler for FrameClock {
    fn schedule(&self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.pending.borrow_mut().push((handle, callback));
        handle
    }

    fn cancel(&self, handle: FrameHandle) -> bool {
        let mut pending = self.pending.borrow_mut();
        let before = pending.len();
        pending.retain(|(h, _)| *h != handle);
        pending.len() != before
    }
}

impl fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameClock")
            .field("pending", &self.pending_count())
            .field("frames", &self.frames.get())
            .finish()
    }
}

/// A repeating per-frame task. Each tick schedules the next one; the most
/// recent handle is kept so cancellation can withdraw it.
pub struct FrameLoop {
    inner: Rc<FrameLoopInner>,
}

struct FrameLoopInner {
    scheduler: Rc<dyn FrameScheduler>,
    handle: Cell<Option<FrameHandle>>,
    cancelled: Cell<bool>,
    ticks: Cell<u64>,
    tick: RefCell<Box<dyn FnMut(u64)>>,
}

impl FrameLoop {
    pub fn start(scheduler: Rc<dyn FrameScheduler>, tick: impl FnMut(u64) + 'static) -> Self {
        let inner = Rc::new(FrameLoopInner {
            scheduler,
            handle: Cell::new(None),
            cancelled: Cell::new(false),
            ticks: Cell::new(0),
            tick: RefCell::new(Box::new(tick)),
        });
        FrameLoopInner::schedule_next(&inner);
        FrameLoop { inner }
    }

    /// Stops the loop. Only the first call does anything.
    pub fn cancel(&self) -> bool {
        if self.inner.cancelled.replace(true) {
            return false;
        }
        if let Some(handle) = self.inner.handle.take() {
            self.inner.scheduler.cancel(handle);
        }
        trace!(ticks = self.inner.ticks.get(), "frame loop cancelled");
        true
    }

    pub fn is_running(&self) -> bool {
        !self.inner.cancelled.get()
    }

    pub fn ticks(&self) -> u64 {
        self.inner.ticks.get()
    }
}

impl FrameLoopInner {
    fn schedule_next(this: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(this);
        let handle = this.scheduler.schedule(Box::new(move |time| {
            if let Some(inner) = weak.upgrade() {
                FrameLoopInner::run(&inner, time);
            }
        }));
        this.handle.set(Some(handle));
    }

    fn run(this: &Rc<Self>, time: u64) {
        this.handle.set(None);
        if this.cancelled.get() {
            return;
        }
        {
            let mut tick = this.tick.borrow_mut();
            (*tick)(time);
        }
        this.ticks.set(this.ticks.get() + 1);
        if !this.cancelled.get() {
            FrameLoopInner::schedule_next(this);
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameLoop")
            .field("running", &self.is_running())
            .field("ticks", &self.ticks())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_runs_each_callback_once() {
        let clock = FrameClock::new();
        let hits = Rc::new(Cell::new(0u64));
        let h = Rc::clone(&hits);
        clock.schedule(Box::new(move |t| h.set(h.get() + t)));

        assert_eq!(clock.run_frame(5), 1);
        assert_eq!(clock.run_frame(7), 0);
        assert_eq!(hits.get(), 5);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn cancelled_callback_never_runs() {
        let clock = FrameClock::new();
        let ran = Rc::new(Cell::new(false));
        let r = Rc::clone(&ran);
        let handle = clock.schedule(Box::new(move |_| r.set(true)));

        assert!(clock.cancel(handle));
        assert!(!clock.cancel(handle));
        clock.run_frame(0);
        assert!(!ran.get());
    }

    #[test]
    fn callbacks_scheduled_during_a_frame_wait_for_the_next() {
        let clock = Rc::new(FrameClock::new());
        let c = Rc::clone(&clock);
        clock.schedule(Box::new(move |_| {
            c.schedule(Box::new(|_| {}));
        }));

        assert_eq!(clock.run_frame(0), 1);
        assert_eq!(clock.pending_count(), 1);
        assert_eq!(clock.run_frame(1), 1);
        assert_eq!(clock.pending_count(), 0);
    }

    #[test]
    fn loop_rearms_every_frame_until_cancelled() {
        let clock = Rc::new(FrameClock::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let frame_loop = FrameLoop::start(clock.clone(), move |t| s.borrow_mut().push(t));

        for t in 0..3 {
            clock.run_frame(t);
        }
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
        assert_eq!(frame_loop.ticks(), 3);
        assert_eq!(clock.pending_count(), 1);

        assert!(frame_loop.cancel());
        assert!(!frame_loop.cancel());
        assert_eq!(clock.pending_count(), 0);
        clock.run_frame(3);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn dropping_the_loop_cancels_it() {
        let clock = Rc::new(FrameClock::new());
        let frame_loop = FrameLoop::start(clock.clone(), |_| {});
        assert_eq!(clock.pending_count(), 1);
        drop(frame_loop);
        assert_eq!(clock.pending_count(), 0);
    }
}
