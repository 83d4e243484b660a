//! Host event-loop capabilities: frame pacing and cancelable timers.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::DemoError;

/// Receives the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;
pub type TimerCallback = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub i32);

pub trait Scheduler {
    /// Runs `callback` once, on the next display refresh.
    fn request_frame(&self, callback: FrameCallback) -> Result<(), DemoError>;
    /// Runs `callback` once after `delay_ms` unless cleared first.
    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> Result<TimerId, DemoError>;
    fn clear_timeout(&self, id: TimerId);
}

/// Trailing-edge debounce: every trigger cancels the pending action and
/// schedules a new one, so a burst collapses into a single call timed from
/// its last event.
pub struct Debouncer<S: Scheduler> {
    scheduler: Rc<S>,
    delay_ms: u32,
    pending: Rc<Cell<Option<TimerId>>>,
}

impl<S: Scheduler> Debouncer<S> {
    pub fn new(scheduler: Rc<S>, delay_ms: u32) -> Self {
        Self {
            scheduler,
            delay_ms,
            pending: Rc::new(Cell::new(None)),
        }
    }

    pub fn trigger<F>(&self, action: F) -> Result<(), DemoError>
    where
        F: FnOnce() + 'static,
    {
        if let Some(id) = self.pending.take() {
            self.scheduler.clear_timeout(id);
        }
        let pending = Rc::clone(&self.pending);
        let id = self.scheduler.set_timeout(
            self.delay_ms,
            Box::new(move || {
                pending.set(None);
                action();
            }),
        )?;
        self.pending.set(Some(id));
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}
