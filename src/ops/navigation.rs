use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::host::{Ctx, Surface, TimerId, TimerKind};
use crate::model::{NavigationConfig, NavigationState};

/// Identifies one navigation so late completions of a superseded one can be
/// told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavTicket(u64);

/// Drives the boosted-navigation loading indicator.
///
/// A thin progress bar appears as soon as a navigation begins and creeps
/// forward on a jittered tick; the full overlay (and content skeleton) only
/// appears if the navigation is still running after the overlay delay.
/// Only one navigation is tracked at a time: beginning a new one cancels
/// every timer of the previous one.
#[derive(Debug)]
pub struct NavigationCoordinator {
    config: NavigationConfig,
    state: NavigationState,
    generation: u64,
    tick_timer: Option<TimerId>,
    reveal_timer: Option<TimerId>,
    hide_timer: Option<TimerId>,
    rng: StdRng,
}

impl NavigationCoordinator {
    pub fn new(config: NavigationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        NavigationCoordinator {
            config,
            state: NavigationState::default(),
            generation: 0,
            tick_timer: None,
            reveal_timer: None,
            hide_timer: None,
            rng,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// The bar is at 100% and waiting for its hide timer
    pub fn is_hiding(&self) -> bool {
        self.hide_timer.is_some()
    }

    /// Ticket of the navigation currently in flight
    pub fn current_ticket(&self) -> Option<NavTicket> {
        self.state.active.then_some(NavTicket(self.generation))
    }

    /// Start tracking a navigation request that was just dispatched.
    pub fn begin<S: Surface>(&mut self, ctx: &mut Ctx<'_, S>) -> NavTicket {
        if self.state.active {
            debug!(
                elapsed_ms = self.state.elapsed(ctx.now).as_millis() as u64,
                "navigation superseded by a newer one"
            );
        }
        self.cancel_timers(ctx);
        if self.state.overlay_visible {
            ctx.surface.show_overlay(false);
            ctx.surface.show_skeleton(false);
        }

        self.generation += 1;
        self.state = NavigationState::started(ctx.now);
        ctx.surface.set_progress(0.0);
        ctx.surface.show_bar(true);
        ctx.surface.announce(&self.config.loading_message);

        self.tick_timer = Some(ctx.every(self.config.tick_interval(), TimerKind::ProgressTick));
        self.reveal_timer = Some(ctx.once(self.config.overlay_delay(), TimerKind::RevealOverlay));
        debug!(generation = self.generation, "navigation started");
        NavTicket(self.generation)
    }

    /// Finish the current navigation.
    ///
    /// On success the bar fills to 100% and both indicators hide after the
    /// hide delay; on failure or timeout they hide at once. Returns false
    /// (and touches nothing) when no navigation is active.
    pub fn complete<S: Surface>(&mut self, ctx: &mut Ctx<'_, S>, success: bool) -> bool {
        if !self.state.active {
            trace!("completion ignored: no active navigation");
            return false;
        }
        self.state.active = false;
        ctx.cancel(&mut self.tick_timer);
        ctx.cancel(&mut self.reveal_timer);
        debug!(
            success,
            elapsed_ms = self.state.elapsed(ctx.now).as_millis() as u64,
            overlay = self.state.overlay_visible,
            "navigation completed"
        );

        if success && !self.config.reduced_motion {
            self.state.progress = 100.0;
            ctx.surface.set_progress(100.0);
            self.hide_timer = Some(ctx.once(self.config.hide_delay(), TimerKind::HideIndicators));
        } else {
            self.hide(ctx);
        }
        true
    }

    /// Complete only if `ticket` still names the navigation in flight
    pub fn complete_if_current<S: Surface>(
        &mut self,
        ctx: &mut Ctx<'_, S>,
        ticket: NavTicket,
        success: bool,
    ) -> bool {
        if ticket.0 != self.generation {
            debug!(
                stale = ticket.0,
                current = self.generation,
                "completion of superseded navigation ignored"
            );
            return false;
        }
        self.complete(ctx, success)
    }

    /// Back/forward navigation must never leave a stuck indicator
    pub fn on_history_navigation<S: Surface>(&mut self, ctx: &mut Ctx<'_, S>) -> bool {
        self.complete(ctx, true)
    }

    /// Handle one of this coordinator's timers
    pub fn on_timer<S: Surface>(&mut self, ctx: &mut Ctx<'_, S>, kind: &TimerKind) {
        match kind {
            TimerKind::ProgressTick => self.tick(ctx),
            TimerKind::RevealOverlay => self.reveal_overlay(ctx),
            TimerKind::HideIndicators => {
                self.hide_timer = None;
                if !self.state.active {
                    self.hide(ctx);
                }
            }
            _ => {}
        }
    }

    /// Drop all pending timers without touching the surface (page unload)
    pub fn teardown<S: Surface>(&mut self, ctx: &mut Ctx<'_, S>) {
        self.cancel_timers(ctx);
        self.state.reset();
    }

    fn tick<S: Surface>(&mut self, ctx: &mut Ctx<'_, S>) {
        if !self.state.active {
            return;
        }
        let step = self.rng.random::<f64>() * self.config.max_tick_increment;
        let next = (self.state.progress + step).min(self.config.progress_cap);
        if next > self.state.progress {
            self.state.progress = next;
            ctx.surface.set_progress(next);
        }
    }

    fn reveal_overlay<S: Surface>(&mut self, ctx: &mut Ctx<'_, S>) {
        self.reveal_timer = None;
        if !self.state.active || self.state.overlay_visible {
            return;
        }
        self.state.overlay_visible = true;
        ctx.surface.show_overlay(true);
        ctx.surface.show_skeleton(true);
    }

    fn hide<S: Surface>(&mut self, ctx: &mut Ctx<'_, S>) {
        ctx.cancel(&mut self.hide_timer);
        ctx.surface.show_bar(false);
        if self.state.overlay_visible {
            ctx.surface.show_overlay(false);
            ctx.surface.show_skeleton(false);
        }
        ctx.surface.announce("");
        self.state.reset();
    }

    fn cancel_timers<S: Surface>(&mut self, ctx: &mut Ctx<'_, S>) {
        ctx.cancel(&mut self.tick_timer);
        ctx.cancel(&mut self.reveal_timer);
        ctx.cancel(&mut self.hide_timer);
    }
}
