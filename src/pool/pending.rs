//! Tracking for surfaces submitted to the consumer but not yet written.

use std::collections::HashMap;

use crate::surface::BufferId;

/// Outcome of a completion signal for one key.
#[derive(Debug)]
pub(crate) enum Completion<S> {
    /// The key was not tracked. Duplicate or late signal.
    Untracked,
    /// The key was reserved but its surface not yet parked.
    ///
    /// The submitter sees the missing slot and recycles the surface itself.
    BeforePark,
    /// The surface is released from tracking and ready to recycle.
    Ready(S),
}

/// Map from buffer id to the surface waiting on its writes.
///
/// A slot is reserved (`None`) before the completion hook is registered and
/// filled (`Some`) afterwards. The hook is registered without holding the
/// pool lock, so it may fire between the two steps.
#[derive(Debug)]
pub(crate) struct PendingSurfaces<S> {
    slots: HashMap<BufferId, Option<S>>,
}

impl<S> PendingSurfaces<S> {
    pub(crate) fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Reserve a slot for `id`. Returns `false` if it is already tracked.
    pub(crate) fn reserve(&mut self, id: BufferId) -> bool {
        if self.slots.contains_key(&id) {
            return false;
        }
        self.slots.insert(id, None);
        true
    }

    /// Park `surface` in its reserved slot.
    ///
    /// Returns the surface back if the slot is gone, meaning its completion
    /// already arrived.
    pub(crate) fn park(&mut self, id: BufferId, surface: S) -> Option<S> {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                *slot = Some(surface);
                None
            }
            None => Some(surface),
        }
    }

    /// Release `id` from tracking in one step.
    pub(crate) fn complete(&mut self, id: BufferId) -> Completion<S> {
        match self.slots.remove(&id) {
            None => Completion::Untracked,
            Some(None) => Completion::BeforePark,
            Some(Some(surface)) => Completion::Ready(surface),
        }
    }

    pub(crate) fn contains(&self, id: BufferId) -> bool {
        self.slots.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}
