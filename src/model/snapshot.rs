use std::collections::HashMap;

use indexmap::IndexMap;

use super::slot::{EditToken, SlotId};

/// Last-known-good value of a slot, captured right before an optimistic edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub value: String,
    pub generation: u64,
}

/// A token that no longer matches its slot's latest generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleToken;

/// Per-slot snapshots of rendered values awaiting confirmation.
///
/// At most one live entry exists per slot. Every `record` bumps the slot's
/// generation, so tokens from earlier edits stop being current.
#[derive(Debug, Clone, Default)]
pub struct OptimisticSnapshot {
    entries: IndexMap<SlotId, SnapshotEntry>,
    generations: HashMap<SlotId, u64>,
}

impl OptimisticSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture `value` for `slot`, overwriting any unresolved snapshot.
    pub fn record(&mut self, slot: &SlotId, value: impl Into<String>) -> EditToken {
        let generation = self.bump(slot);
        self.entries.insert(
            slot.clone(),
            SnapshotEntry {
                value: value.into(),
                generation,
            },
        );
        EditToken {
            slot: slot.clone(),
            generation,
        }
    }

    /// True when `token` is the latest edit issued for its slot
    pub fn is_current(&self, token: &EditToken) -> bool {
        self.generations.get(&token.slot) == Some(&token.generation)
    }

    /// Latest generation issued for `slot` (0 if never edited)
    pub fn generation(&self, slot: &SlotId) -> u64 {
        self.generations.get(slot).copied().unwrap_or(0)
    }

    pub fn get(&self, slot: &SlotId) -> Option<&SnapshotEntry> {
        self.entries.get(slot)
    }

    pub fn contains(&self, slot: &SlotId) -> bool {
        self.entries.contains_key(slot)
    }

    /// Remove and return the snapshot for `slot`, regardless of generation.
    pub fn take(&mut self, slot: &SlotId) -> Option<SnapshotEntry> {
        self.entries.shift_remove(slot)
    }

    /// Remove and return the snapshot only if `token` is still current.
    ///
    /// A superseded token leaves the live snapshot (if any) untouched.
    pub fn take_current(&mut self, token: &EditToken) -> Result<Option<SnapshotEntry>, StaleToken> {
        if !self.is_current(token) {
            return Err(StaleToken);
        }
        Ok(self.entries.shift_remove(&token.slot))
    }

    /// Drop the snapshot for `slot` and advance its generation, so tokens
    /// issued before this point are stale even if the slot is mounted again.
    pub fn invalidate(&mut self, slot: &SlotId) -> Option<SnapshotEntry> {
        let entry = self.entries.shift_remove(slot);
        if self.generations.contains_key(slot) {
            self.bump(slot);
        }
        entry
    }

    /// Drop every snapshot and advance every slot's generation so that all
    /// outstanding tokens become stale. Returns the slots that had a live
    /// snapshot, in the order they were first recorded.
    pub fn invalidate_all(&mut self) -> Vec<SlotId> {
        let dropped: Vec<SlotId> = self.entries.drain(..).map(|(slot, _)| slot).collect();
        for generation in self.generations.values_mut() {
            *generation += 1;
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn slots(&self) -> impl Iterator<Item = &SlotId> {
        self.entries.keys()
    }

    fn bump(&mut self, slot: &SlotId) -> u64 {
        let generation = self.generations.entry(slot.clone()).or_insert(0);
        *generation += 1;
        *generation
    }
}
