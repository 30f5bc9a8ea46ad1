//! Toggle events
//!
//! Listeners observe every toggle at three points. Only the prepare event can
//! stop a toggle; start and end are notifications. A listener that panics is
//! logged and skipped; during prepare it cancels the toggle.

use crate::pipeline::PreparedToggle;
use parking_lot::RwLock;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use swivel_animation::AnimationState;

const LISTENER_FAILED: &str = "a toggle listener failed";

/// Answer of a listener to the prepare event
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EventVerdict {
    #[default]
    Allow,
    /// Stop the toggle with a reason shown to the requester
    Cancel(String),
}

/// Observer of toggles
///
/// `on_prepare` runs on the requesting thread; `on_start` and `on_end` run on
/// the tick thread.
pub trait ToggleListener: Send + Sync {
    fn on_prepare(&self, _toggle: &PreparedToggle) -> EventVerdict {
        EventVerdict::Allow
    }

    fn on_start(&self, _toggle: &PreparedToggle) {}

    /// `state` is `Completed` or `Skipped`
    fn on_end(&self, _toggle: &PreparedToggle, _state: AnimationState) {}
}

/// Ordered set of toggle listeners
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<Vec<Arc<dyn ToggleListener>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Arc<dyn ToggleListener>) {
        self.listeners.write().push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Ask every listener; the first cancellation wins
    pub fn prepare(&self, toggle: &PreparedToggle) -> EventVerdict {
        for listener in self.snapshot() {
            let verdict = guarded(toggle, "prepare", || listener.on_prepare(toggle))
                .unwrap_or_else(|| EventVerdict::Cancel(LISTENER_FAILED.to_string()));
            if let EventVerdict::Cancel(reason) = verdict {
                return EventVerdict::Cancel(reason);
            }
        }
        EventVerdict::Allow
    }

    pub fn start(&self, toggle: &PreparedToggle) {
        for listener in self.snapshot() {
            guarded(toggle, "start", || listener.on_start(toggle));
        }
    }

    pub fn end(&self, toggle: &PreparedToggle, state: AnimationState) {
        for listener in self.snapshot() {
            guarded(toggle, "end", || listener.on_end(toggle, state));
        }
    }

    // Listeners may subscribe others while being called
    fn snapshot(&self) -> Vec<Arc<dyn ToggleListener>> {
        self.listeners.read().clone()
    }
}

fn guarded<T>(toggle: &PreparedToggle, event: &str, call: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(value) => Some(value),
        Err(payload) => {
            tracing::warn!(
                "Toggle listener panicked on {} of {}: {}",
                event,
                toggle.id(),
                panic_message(&*payload)
            );
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.len())
            .finish()
    }
}
