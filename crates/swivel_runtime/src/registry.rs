//! Admission registry
//!
//! Tracks which structures have an animation in flight. Checking and
//! inserting happen under one lock so two requests for the same structure
//! can never both be admitted.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use swivel_animation::AnimationState;
use swivel_core::StructureId;

/// Shared map of structure id to the state of its in-flight animation
#[derive(Clone, Default)]
pub struct AnimationRegistry {
    inner: Arc<Mutex<FxHashMap<StructureId, AnimationState>>>,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `id`, or `None` if it is already held
    pub fn try_acquire(&self, id: StructureId) -> Option<AdmissionSlot> {
        let mut map = self.inner.lock();
        if map.contains_key(&id) {
            return None;
        }
        map.insert(id, AnimationState::Pending);
        Some(AdmissionSlot {
            id,
            registry: self.clone(),
        })
    }

    pub fn is_busy(&self, id: StructureId) -> bool {
        self.inner.lock().contains_key(&id)
    }

    /// State of the animation holding `id`'s slot
    pub fn state(&self, id: StructureId) -> Option<AnimationState> {
        self.inner.lock().get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    fn release(&self, id: StructureId) {
        self.inner.lock().remove(&id);
    }
}

impl std::fmt::Debug for AnimationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationRegistry")
            .field("in_flight", &self.len())
            .finish()
    }
}

/// A held admission slot; dropping it releases the structure
#[derive(Debug)]
pub struct AdmissionSlot {
    id: StructureId,
    registry: AnimationRegistry,
}

impl AdmissionSlot {
    pub fn id(&self) -> StructureId {
        self.id
    }

    /// Publish the state of the animation holding this slot
    pub fn set_state(&self, state: AnimationState) {
        if let Some(entry) = self.registry.inner.lock().get_mut(&self.id) {
            *entry = state;
        }
    }
}

impl Drop for AdmissionSlot {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}
