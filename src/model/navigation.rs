use std::time::Duration;

/// Live state of the boosted-navigation loading indicator
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationState {
    /// A navigation request is in flight
    pub active: bool,
    /// Host time at which the current navigation began
    pub started_at: Duration,
    /// Bar fill, 0–100
    pub progress: f64,
    /// The full-page overlay has been revealed for this navigation
    pub overlay_visible: bool,
}

impl NavigationState {
    /// Fresh state for a navigation beginning at `now`
    pub fn started(now: Duration) -> Self {
        NavigationState {
            active: true,
            started_at: now,
            progress: 0.0,
            overlay_visible: false,
        }
    }

    /// Return to the idle state once the indicator is fully hidden
    pub fn reset(&mut self) {
        *self = NavigationState::default();
    }

    /// How long the current navigation has been running
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }
}
