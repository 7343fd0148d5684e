use indexmap::IndexMap;

use crate::model::SlotId;

/// Mapping from logical slot names to the elements that render them.
///
/// Populated when components mount, so lookups are direct rather than
/// selector or id-substring searches.
#[derive(Debug, Clone)]
pub struct SlotRegistry<E> {
    slots: IndexMap<SlotId, E>,
}

impl<E> Default for SlotRegistry<E> {
    fn default() -> Self {
        SlotRegistry {
            slots: IndexMap::new(),
        }
    }
}

impl<E> SlotRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `slot` to `element`, returning the element it replaced
    pub fn mount(&mut self, slot: SlotId, element: E) -> Option<E> {
        self.slots.insert(slot, element)
    }

    pub fn unmount(&mut self, slot: &SlotId) -> Option<E> {
        self.slots.shift_remove(slot)
    }

    pub fn get(&self, slot: &SlotId) -> Option<&E> {
        self.slots.get(slot)
    }

    pub fn contains(&self, slot: &SlotId) -> bool {
        self.slots.contains_key(slot)
    }

    /// Mounted slots in mount order
    pub fn slots(&self) -> impl Iterator<Item = (&SlotId, &E)> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
