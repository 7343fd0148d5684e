pub mod document;
pub mod registry;
pub mod scheduler;
pub mod surface;

pub use document::{Document, Effect, Node, NodeId};
pub use registry::SlotRegistry;
pub use scheduler::{Fired, Scheduler, TimerId};
pub use surface::Surface;

use std::time::Duration;

use crate::model::{SlotId, ToastId};

/// Deferred work the indicator layer schedules on the host event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerKind {
    /// Recurring bar advance while a navigation is active
    ProgressTick,
    /// Delayed reveal of the full overlay
    RevealOverlay,
    /// Hide the indicators once the completion animation has run
    HideIndicators,
    /// Remove the transient error marker left by a revert
    ClearErrorMarker(SlotId),
    DismissToast(ToastId),
}

/// What an operation needs from the host: the current time, the timer
/// queue and the surface to mutate.
pub struct Ctx<'a, S: Surface> {
    pub now: Duration,
    pub timers: &'a mut Scheduler<TimerKind>,
    pub surface: &'a mut S,
}

impl<'a, S: Surface> Ctx<'a, S> {
    pub fn new(now: Duration, timers: &'a mut Scheduler<TimerKind>, surface: &'a mut S) -> Self {
        Ctx {
            now,
            timers,
            surface,
        }
    }

    /// Schedule a one-shot timer relative to `now`
    pub fn once(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        self.timers.once(self.now, delay, kind)
    }

    /// Schedule a periodic timer relative to `now`
    pub fn every(&mut self, period: Duration, kind: TimerKind) -> TimerId {
        self.timers.every(self.now, period, kind)
    }

    /// Cancel the timer in `slot`, if any, leaving `None` behind
    pub fn cancel(&mut self, slot: &mut Option<TimerId>) {
        if let Some(id) = slot.take() {
            self.timers.cancel(id);
        }
    }
}
