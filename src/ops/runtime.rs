use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, trace};

use super::navigation::{NavTicket, NavigationCoordinator};
use super::optimistic::OptimisticTracker;
use super::triggers::{self, Directive};
use crate::host::{Ctx, Scheduler, Surface, TimerKind};
use crate::model::{
    EditToken, HostEvent, OptimisticEdit, RequestId, ResponseHeaders, SlotId, Toast, ToastId,
    VeneerConfig,
};

/// Routes host events to the navigation coordinator and the optimistic
/// tracker, and owns everything they share: the clock, the timer queue and
/// the surface.
///
/// All work happens on the caller's thread. The host feeds events through
/// [`Runtime::handle`] and moves time forward with [`Runtime::advance_to`]
/// (or [`Runtime::fire_next`] when it needs to observe each timer).
pub struct Runtime<S: Surface> {
    config: VeneerConfig,
    now: Duration,
    timers: Scheduler<TimerKind>,
    surface: S,
    navigation: NavigationCoordinator,
    tracker: OptimisticTracker<S::Element>,
    pending_edits: HashMap<RequestId, EditToken>,
    closing_requests: Vec<RequestId>,
    nav_request: Option<(RequestId, NavTicket)>,
    next_toast: u64,
}

impl<S: Surface> Runtime<S> {
    pub fn new(config: VeneerConfig, surface: S) -> Self {
        let navigation = NavigationCoordinator::new(config.navigation.clone());
        let tracker = OptimisticTracker::new(config.optimistic.clone());
        Runtime {
            config,
            now: Duration::ZERO,
            timers: Scheduler::new(),
            surface,
            navigation,
            tracker,
            pending_edits: HashMap::new(),
            closing_requests: Vec::new(),
            nav_request: None,
            next_toast: 0,
        }
    }

    pub fn config(&self) -> &VeneerConfig {
        &self.config
    }

    /// Current host time
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn navigation(&self) -> &NavigationCoordinator {
        &self.navigation
    }

    pub fn tracker(&self) -> &OptimisticTracker<S::Element> {
        &self.tracker
    }

    pub fn timers(&self) -> &Scheduler<TimerKind> {
        &self.timers
    }

    /// Register the element rendering `slot` (component mount)
    pub fn mount_slot(&mut self, slot: SlotId, element: S::Element) {
        self.tracker.mount(slot, element);
    }

    pub fn unmount_slot(&mut self, slot: &SlotId) {
        let mut ctx = Ctx::new(self.now, &mut self.timers, &mut self.surface);
        self.tracker.unmount(&mut ctx, slot);
    }

    /// Deliver one host event at the current time
    pub fn handle(&mut self, event: &HostEvent) {
        trace!(event = event.name(), now_ms = self.now.as_millis() as u64, "host event");
        match event {
            HostEvent::BeforeRequest {
                request,
                boosted,
                edit,
                closes_transaction,
            } => self.before_request(*request, *boosted, edit.as_ref(), *closes_transaction),
            HostEvent::AfterRequest {
                request,
                successful,
                headers,
            } => self.after_request(*request, *successful, headers),
            HostEvent::ResponseError { request } | HostEvent::Timeout { request } => {
                self.finish_request(*request, false);
            }
            HostEvent::PushedIntoHistory { path } => {
                debug!(%path, "history navigation");
                self.nav_request = None;
                let mut ctx = Ctx::new(self.now, &mut self.timers, &mut self.surface);
                self.navigation.on_history_navigation(&mut ctx);
            }
            HostEvent::BeforeUnload => self.teardown(),
        }
    }

    /// Fire the earliest timer due at or before `until`, moving the clock to
    /// its deadline. Returns the deadline, or `None` when nothing is due (the
    /// clock is left where it was).
    pub fn fire_next(&mut self, until: Duration) -> Option<Duration> {
        let fired = self.timers.pop_due(until)?;
        self.now = self.now.max(fired.deadline);
        let mut ctx = Ctx::new(self.now, &mut self.timers, &mut self.surface);
        match &fired.kind {
            TimerKind::ProgressTick | TimerKind::RevealOverlay | TimerKind::HideIndicators => {
                self.navigation.on_timer(&mut ctx, &fired.kind)
            }
            TimerKind::ClearErrorMarker(_) => self.tracker.on_timer(&mut ctx, &fired.kind),
            TimerKind::DismissToast(id) => ctx.surface.dismiss_toast(*id),
        }
        Some(fired.deadline)
    }

    /// Run every timer due up to `until`, then set the clock to `until`
    pub fn advance_to(&mut self, until: Duration) {
        while self.fire_next(until).is_some() {}
        self.now = self.now.max(until);
    }

    pub fn advance_by(&mut self, delta: Duration) {
        self.advance_to(self.now + delta);
    }

    /// Resolve the enclosing transaction: drop every optimistic snapshot
    pub fn clear_all(&mut self) -> usize {
        let mut ctx = Ctx::new(self.now, &mut self.timers, &mut self.surface);
        self.tracker.clear_all(&mut ctx)
    }

    fn before_request(
        &mut self,
        request: RequestId,
        boosted: bool,
        edit: Option<&OptimisticEdit>,
        closes_transaction: bool,
    ) {
        let mut ctx = Ctx::new(self.now, &mut self.timers, &mut self.surface);
        if let Some(edit) = edit
            && let Some(token) = self.tracker.apply(&mut ctx, &edit.slot, &edit.value)
        {
            self.pending_edits.insert(request, token);
        }
        if boosted {
            let ticket = self.navigation.begin(&mut ctx);
            self.nav_request = Some((request, ticket));
        }
        if closes_transaction {
            self.closing_requests.push(request);
        }
    }

    fn after_request(&mut self, request: RequestId, successful: bool, headers: &ResponseHeaders) {
        let closes = self.finish_request(request, successful);
        if successful && closes {
            self.clear_all();
        }
        for toast in triggers::toasts(headers) {
            self.show_toast(toast);
        }
        if successful && let Some(directive) = triggers::navigation_directive(headers) {
            let target = match &directive {
                Directive::Redirect(location) => location.as_str(),
                Directive::Refresh => "(refresh)",
            };
            debug!(%request, target, "server requested a full-page transition");
            let mut ctx = Ctx::new(self.now, &mut self.timers, &mut self.surface);
            self.navigation.begin(&mut ctx);
            // Not tied to a request: completes on the next history push or unload
            self.nav_request = None;
        }
    }

    /// Resolve the edit and navigation tied to `request`. A request already
    /// resolved by an earlier error or timeout event is a no-op. Returns
    /// whether the request was marked as closing its transaction.
    fn finish_request(&mut self, request: RequestId, successful: bool) -> bool {
        let mut ctx = Ctx::new(self.now, &mut self.timers, &mut self.surface);
        if let Some(token) = self.pending_edits.remove(&request) {
            let resolution = if successful {
                self.tracker.confirm_edit(&mut ctx, &token)
            } else {
                self.tracker.revert_edit(&mut ctx, &token)
            };
            debug!(%request, slot = %token.slot, ?resolution, "edit resolved");
        }
        if let Some((nav_request, ticket)) = self.nav_request
            && nav_request == request
        {
            self.nav_request = None;
            self.navigation.complete_if_current(&mut ctx, ticket, successful);
        }
        match self.closing_requests.iter().position(|r| *r == request) {
            Some(index) => {
                self.closing_requests.swap_remove(index);
                true
            }
            None => false,
        }
    }

    fn show_toast(&mut self, toast: Toast) {
        let id = ToastId(self.next_toast);
        self.next_toast += 1;
        self.surface.show_toast(id, &toast);
        self.timers.once(
            self.now,
            Duration::from_millis(self.config.toast.duration_ms),
            TimerKind::DismissToast(id),
        );
    }

    fn teardown(&mut self) {
        debug!("page unloading; dropping pending indicator work");
        let mut ctx = Ctx::new(self.now, &mut self.timers, &mut self.surface);
        self.navigation.teardown(&mut ctx);
        self.tracker.teardown(&mut ctx);
        self.timers.clear();
        self.pending_edits.clear();
        self.closing_requests.clear();
        self.nav_request = None;
    }
}
