use std::collections::HashMap;
use std::fmt::Debug;

use tracing::debug;

use crate::host::{Ctx, SlotRegistry, Surface, TimerId, TimerKind};
use crate::model::{
    EditToken, OptimisticConfig, OptimisticSnapshot, SlotId, SlotMarker, SnapshotEntry, StaleToken,
};

/// Outcome of confirming or reverting an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The surface was updated
    Applied,
    /// A newer edit (or a transaction reset) superseded this one
    Stale,
    /// Nothing to act on: no pending snapshot, slot not mounted or element detached
    Missing,
}

/// Snapshot/rollback bookkeeping for in-place edits, keyed by slot.
///
/// Slots are independent: any number can be pending at once and nothing
/// done to one slot touches another.
#[derive(Debug)]
pub struct OptimisticTracker<E> {
    config: OptimisticConfig,
    registry: SlotRegistry<E>,
    snapshots: OptimisticSnapshot,
    error_timers: HashMap<SlotId, TimerId>,
}

impl<E: Clone + Debug> OptimisticTracker<E> {
    pub fn new(config: OptimisticConfig) -> Self {
        OptimisticTracker {
            config,
            registry: SlotRegistry::new(),
            snapshots: OptimisticSnapshot::new(),
            error_timers: HashMap::new(),
        }
    }

    /// Bind a slot to the element rendering it
    pub fn mount(&mut self, slot: SlotId, element: E) -> Option<E> {
        self.registry.mount(slot, element)
    }

    /// Forget a slot, its pending snapshot and its error-marker timer.
    ///
    /// Tokens issued to the old element become stale, so a late response
    /// cannot act on an element mounted later under the same slot.
    pub fn unmount<S: Surface<Element = E>>(
        &mut self,
        ctx: &mut Ctx<'_, S>,
        slot: &SlotId,
    ) -> Option<E> {
        self.snapshots.invalidate(slot);
        if let Some(id) = self.error_timers.remove(slot) {
            ctx.timers.cancel(id);
        }
        self.registry.unmount(slot)
    }

    pub fn registry(&self) -> &SlotRegistry<E> {
        &self.registry
    }

    pub fn snapshots(&self) -> &OptimisticSnapshot {
        &self.snapshots
    }

    /// Snapshot the slot's current value, render `value` in its place and
    /// mark it tentative. Must run before the request is dispatched.
    ///
    /// Returns `None` without touching anything when the slot is not mounted
    /// or its element is detached.
    pub fn apply<S: Surface<Element = E>>(
        &mut self,
        ctx: &mut Ctx<'_, S>,
        slot: &SlotId,
        value: &str,
    ) -> Option<EditToken> {
        let Some(element) = self.registry.get(slot).cloned() else {
            debug!(%slot, "optimistic edit skipped: slot not mounted");
            return None;
        };
        let Some(current) = ctx.surface.read_value(&element) else {
            debug!(%slot, "optimistic edit skipped: element detached");
            return None;
        };
        if let Some(id) = self.error_timers.remove(slot) {
            ctx.timers.cancel(id);
        }

        let token = self.snapshots.record(slot, current);
        ctx.surface.write_value(&element, value);
        ctx.surface.set_marker(&element, Some(SlotMarker::Tentative));
        debug!(%slot, generation = token.generation, "optimistic edit applied");
        Some(token)
    }

    /// Accept whatever edit is pending on `slot`
    pub fn confirm<S: Surface<Element = E>>(
        &mut self,
        ctx: &mut Ctx<'_, S>,
        slot: &SlotId,
    ) -> Resolution {
        match self.snapshots.take(slot) {
            Some(_) => self.unmark(ctx, slot),
            None => Resolution::Missing,
        }
    }

    /// Accept the edit identified by `token`, unless it was superseded
    pub fn confirm_edit<S: Surface<Element = E>>(
        &mut self,
        ctx: &mut Ctx<'_, S>,
        token: &EditToken,
    ) -> Resolution {
        match self.snapshots.take_current(token) {
            Err(StaleToken) => {
                debug!(
                    slot = %token.slot,
                    generation = token.generation,
                    "stale confirmation ignored"
                );
                Resolution::Stale
            }
            Ok(None) => Resolution::Missing,
            Ok(Some(_)) => self.unmark(ctx, &token.slot),
        }
    }

    /// Roll back whatever edit is pending on `slot`
    pub fn revert<S: Surface<Element = E>>(
        &mut self,
        ctx: &mut Ctx<'_, S>,
        slot: &SlotId,
    ) -> Resolution {
        let entry = self.snapshots.take(slot);
        self.restore(ctx, slot, entry)
    }

    /// Roll back the edit identified by `token`, unless it was superseded
    pub fn revert_edit<S: Surface<Element = E>>(
        &mut self,
        ctx: &mut Ctx<'_, S>,
        token: &EditToken,
    ) -> Resolution {
        match self.snapshots.take_current(token) {
            Err(StaleToken) => {
                debug!(slot = %token.slot, generation = token.generation, "stale revert ignored");
                Resolution::Stale
            }
            Ok(entry) => self.restore(ctx, &token.slot, entry),
        }
    }

    /// Drop every snapshot once the enclosing transaction has resolved.
    ///
    /// Tentative markers on the dropped slots are removed and every
    /// outstanding token becomes stale, so late responses cannot act on the
    /// next interaction. Returns the number of snapshots dropped.
    pub fn clear_all<S: Surface<Element = E>>(&mut self, ctx: &mut Ctx<'_, S>) -> usize {
        let dropped = self.snapshots.invalidate_all();
        for slot in &dropped {
            if let Some(element) = self.registry.get(slot) {
                ctx.surface.set_marker(element, None);
            }
        }
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "optimistic snapshots cleared");
        }
        dropped.len()
    }

    /// Handle one of this tracker's timers
    pub fn on_timer<S: Surface<Element = E>>(&mut self, ctx: &mut Ctx<'_, S>, kind: &TimerKind) {
        if let TimerKind::ClearErrorMarker(slot) = kind
            && self.error_timers.remove(slot).is_some()
            && let Some(element) = self.registry.get(slot)
        {
            ctx.surface.set_marker(element, None);
        }
    }

    /// Drop timers and snapshots without touching the surface (page unload)
    pub fn teardown<S: Surface<Element = E>>(&mut self, ctx: &mut Ctx<'_, S>) {
        for (_, id) in self.error_timers.drain() {
            ctx.timers.cancel(id);
        }
        self.snapshots.invalidate_all();
    }

    fn unmark<S: Surface<Element = E>>(
        &mut self,
        ctx: &mut Ctx<'_, S>,
        slot: &SlotId,
    ) -> Resolution {
        let Some(element) = self.registry.get(slot) else {
            return Resolution::Missing;
        };
        ctx.surface.set_marker(element, None);
        Resolution::Applied
    }

    fn restore<S: Surface<Element = E>>(
        &mut self,
        ctx: &mut Ctx<'_, S>,
        slot: &SlotId,
        entry: Option<SnapshotEntry>,
    ) -> Resolution {
        let Some(element) = self.registry.get(slot).cloned() else {
            debug!(%slot, "revert skipped: slot not mounted");
            return Resolution::Missing;
        };
        let attached = match &entry {
            Some(entry) => ctx.surface.write_value(&element, &entry.value),
            None => ctx.surface.read_value(&element).is_some(),
        };
        if !attached {
            debug!(%slot, "revert skipped: element detached");
            return Resolution::Missing;
        }

        ctx.surface.set_marker(&element, Some(SlotMarker::Error));
        ctx.surface.announce(&self.config.failure_message);
        let timer = ctx.once(
            self.config.error_marker(),
            TimerKind::ClearErrorMarker(slot.clone()),
        );
        if let Some(old) = self.error_timers.insert(slot.clone(), timer) {
            ctx.timers.cancel(old);
        }
        debug!(%slot, restored = entry.is_some(), "optimistic edit reverted");
        Resolution::Applied
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::host::{Document, NodeId, Scheduler};

    struct Harness {
        now: Duration,
        timers: Scheduler<TimerKind>,
        doc: Document,
        tracker: OptimisticTracker<NodeId>,
    }

    fn slot(name: &str) -> SlotId {
        SlotId::new(name).unwrap()
    }

    impl Harness {
        fn new() -> Self {
            Harness {
                now: Duration::ZERO,
                timers: Scheduler::new(),
                doc: Document::new(),
                tracker: OptimisticTracker::new(OptimisticConfig::default()),
            }
        }

        fn mount(&mut self, name: &str, value: &str) -> NodeId {
            let node = self.doc.mount(name, value);
            self.tracker.mount(slot(name), node);
            node
        }

        fn with<R>(
            &mut self,
            f: impl FnOnce(&mut OptimisticTracker<NodeId>, &mut Ctx<'_, Document>) -> R,
        ) -> R {
            let mut ctx = Ctx::new(self.now, &mut self.timers, &mut self.doc);
            f(&mut self.tracker, &mut ctx)
        }

        fn advance_to(&mut self, ms: u64) {
            let until = Duration::from_millis(ms);
            while let Some(fired) = self.timers.pop_due(until) {
                self.now = fired.deadline;
                let mut ctx = Ctx::new(self.now, &mut self.timers, &mut self.doc);
                self.tracker.on_timer(&mut ctx, &fired.kind);
            }
            self.now = until;
        }
    }

    #[test]
    fn apply_renders_tentative_value() {
        let mut h = Harness::new();
        let node = h.mount("account-name", "Checking");
        let token = h.with(|t, ctx| t.apply(ctx, &slot("account-name"), "Savings"));

        assert!(token.is_some());
        assert_eq!(h.doc.value(node), Some("Savings"));
        assert_eq!(h.doc.marker(node), Some(SlotMarker::Tentative));
        assert_eq!(
            h.tracker.snapshots().get(&slot("account-name")).unwrap().value,
            "Checking"
        );
    }

    #[test]
    fn confirm_keeps_value_and_drops_snapshot() {
        let mut h = Harness::new();
        let node = h.mount("account-name", "Checking");
        let token = h
            .with(|t, ctx| t.apply(ctx, &slot("account-name"), "Savings"))
            .unwrap();
        assert_eq!(h.with(|t, ctx| t.confirm_edit(ctx, &token)), Resolution::Applied);

        assert_eq!(h.doc.value(node), Some("Savings"));
        assert_eq!(h.doc.marker(node), None);
        assert!(h.tracker.snapshots().is_empty());
    }

    #[test]
    fn revert_restores_and_flags_error_then_clears() {
        let mut h = Harness::new();
        let node = h.mount("transaction-amount", "R$ 10,00");
        h.with(|t, ctx| t.apply(ctx, &slot("transaction-amount"), "R$ 12,50"));
        assert_eq!(
            h.with(|t, ctx| t.revert(ctx, &slot("transaction-amount"))),
            Resolution::Applied
        );

        assert_eq!(h.doc.value(node), Some("R$ 10,00"));
        assert_eq!(h.doc.marker(node), Some(SlotMarker::Error));
        assert_eq!(
            h.doc.live_region,
            "Não foi possível salvar. O valor anterior foi restaurado."
        );

        h.advance_to(1999);
        assert_eq!(h.doc.marker(node), Some(SlotMarker::Error));
        h.advance_to(2000);
        assert_eq!(h.doc.marker(node), None);
    }

    #[test]
    fn second_edit_overwrites_snapshot() {
        let mut h = Harness::new();
        let node = h.mount("account-name", "A");
        let first = h.with(|t, ctx| t.apply(ctx, &slot("account-name"), "B")).unwrap();
        let second = h.with(|t, ctx| t.apply(ctx, &slot("account-name"), "C")).unwrap();

        // The first request's failure arrives late and must not clobber "C"
        assert_eq!(h.with(|t, ctx| t.revert_edit(ctx, &first)), Resolution::Stale);
        assert_eq!(h.doc.value(node), Some("C"));

        assert_eq!(h.with(|t, ctx| t.revert_edit(ctx, &second)), Resolution::Applied);
        assert_eq!(h.doc.value(node), Some("B"));
    }

    #[test]
    fn stale_confirm_leaves_newer_edit_pending() {
        let mut h = Harness::new();
        let node = h.mount("account-name", "A");
        let first = h.with(|t, ctx| t.apply(ctx, &slot("account-name"), "B")).unwrap();
        h.with(|t, ctx| t.apply(ctx, &slot("account-name"), "C"));

        assert_eq!(h.with(|t, ctx| t.confirm_edit(ctx, &first)), Resolution::Stale);
        assert_eq!(h.doc.marker(node), Some(SlotMarker::Tentative));
        assert_eq!(h.tracker.snapshots().len(), 1);
    }

    #[test]
    fn slots_do_not_interfere() {
        let mut h = Harness::new();
        let name = h.mount("account-name", "Checking");
        let amount = h.mount("transaction-amount", "R$ 1,00");
        h.with(|t, ctx| t.apply(ctx, &slot("account-name"), "Savings"));
        h.with(|t, ctx| t.apply(ctx, &slot("transaction-amount"), "R$ 2,00"));

        h.with(|t, ctx| t.revert(ctx, &slot("transaction-amount")));
        assert_eq!(h.doc.value(amount), Some("R$ 1,00"));
        assert_eq!(h.doc.value(name), Some("Savings"));
        assert_eq!(h.doc.marker(name), Some(SlotMarker::Tentative));
    }

    #[test]
    fn unmounted_slot_is_a_silent_no_op() {
        let mut h = Harness::new();
        assert_eq!(h.with(|t, ctx| t.apply(ctx, &slot("ghost"), "x")), None);
        assert_eq!(h.with(|t, ctx| t.revert(ctx, &slot("ghost"))), Resolution::Missing);
        assert_eq!(h.with(|t, ctx| t.confirm(ctx, &slot("ghost"))), Resolution::Missing);
        assert!(h.doc.effects().is_empty());
    }

    #[test]
    fn late_failure_does_not_touch_remounted_slot() {
        let mut h = Harness::new();
        h.mount("account-name", "A");
        let token = h.with(|t, ctx| t.apply(ctx, &slot("account-name"), "B")).unwrap();
        h.with(|t, ctx| t.unmount(ctx, &slot("account-name")));
        let fresh = h.mount("account-name", "Server value");

        assert_eq!(h.with(|t, ctx| t.revert_edit(ctx, &token)), Resolution::Stale);
        assert_eq!(h.doc.value(fresh), Some("Server value"));
        assert_eq!(h.doc.marker(fresh), None);
        assert_eq!(h.doc.live_region, "");
    }

    #[test]
    fn unmount_cancels_pending_error_clear() {
        let mut h = Harness::new();
        h.mount("account-name", "A");
        h.with(|t, ctx| t.apply(ctx, &slot("account-name"), "B"));
        h.with(|t, ctx| t.revert(ctx, &slot("account-name")));
        h.with(|t, ctx| t.unmount(ctx, &slot("account-name")));
        assert!(h.timers.is_empty());
    }

    #[test]
    fn detached_element_is_a_silent_no_op() {
        let mut h = Harness::new();
        let node = h.mount("account-name", "Checking");
        h.doc.detach(node);
        assert_eq!(h.with(|t, ctx| t.apply(ctx, &slot("account-name"), "x")), None);
        assert!(h.tracker.snapshots().is_empty());
    }

    #[test]
    fn revert_without_snapshot_still_flags() {
        let mut h = Harness::new();
        let node = h.mount("account-name", "Checking");
        assert_eq!(
            h.with(|t, ctx| t.revert(ctx, &slot("account-name"))),
            Resolution::Applied
        );
        assert_eq!(h.doc.value(node), Some("Checking"));
        assert_eq!(h.doc.marker(node), Some(SlotMarker::Error));
    }

    #[test]
    fn new_edit_cancels_pending_error_clear() {
        let mut h = Harness::new();
        let node = h.mount("account-name", "A");
        h.with(|t, ctx| t.apply(ctx, &slot("account-name"), "B"));
        h.with(|t, ctx| t.revert(ctx, &slot("account-name")));
        h.advance_to(500);
        h.with(|t, ctx| t.apply(ctx, &slot("account-name"), "C"));
        h.advance_to(5000);
        assert_eq!(h.doc.marker(node), Some(SlotMarker::Tentative));
    }

    #[test]
    fn clear_all_drops_everything_and_stales_tokens() {
        let mut h = Harness::new();
        let a = h.mount("account-name", "A");
        let b = h.mount("transaction-amount", "1");
        let token = h.with(|t, ctx| t.apply(ctx, &slot("account-name"), "A2")).unwrap();
        h.with(|t, ctx| t.apply(ctx, &slot("transaction-amount"), "2"));

        assert_eq!(h.with(|t, ctx| t.clear_all(ctx)), 2);
        assert!(h.tracker.snapshots().is_empty());
        assert_eq!(h.doc.marker(a), None);
        assert_eq!(h.doc.marker(b), None);
        assert_eq!(h.with(|t, ctx| t.revert_edit(ctx, &token)), Resolution::Stale);
        assert_eq!(h.doc.value(a), Some("A2"));
    }
}
