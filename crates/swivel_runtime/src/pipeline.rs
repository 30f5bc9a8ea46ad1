//! Toggle request pipeline
//!
//! The first stages of a toggle run on the requesting thread: resolving the
//! request against the structure's state, planning the movement and asking
//! listeners. Admission and everything after it happen on the tick thread.

use crate::config::RuntimeConfig;
use crate::error::{Result, ToggleError};
use crate::events::{EventBus, EventVerdict};
use crate::executor::{TickCommand, TickHandle};
use crate::registry::AnimationRegistry;
use crate::request::{ToggleAction, ToggleCause, ToggleRequest, ToggleResult, ToggleTicket};
use std::sync::mpsc;
use std::sync::Arc;
use swivel_animation::{
    animation_duration, plan_motion, AnimationConfig, AnimationHookManager, MotionPlan,
};
use swivel_core::{Cuboid, MovementDirection, StructureId, StructureSnapshot, WorldContext};

// ============================================================================
// Prepared toggle
// ============================================================================

/// A request that passed the caller-side checks
#[derive(Clone, Debug)]
pub struct PreparedToggle {
    request: ToggleRequest,
    snapshot: Arc<StructureSnapshot>,
    plan: MotionPlan,
    duration: u32,
    opening: bool,
}

impl PreparedToggle {
    pub fn id(&self) -> StructureId {
        self.snapshot.id()
    }

    pub fn request(&self) -> &ToggleRequest {
        &self.request
    }

    /// The structure as it was when the request was prepared
    pub fn snapshot(&self) -> &Arc<StructureSnapshot> {
        &self.snapshot
    }

    pub fn plan(&self) -> &MotionPlan {
        &self.plan
    }

    pub fn direction(&self) -> MovementDirection {
        self.plan.direction
    }

    pub fn new_cuboid(&self) -> Cuboid {
        self.plan.new_cuboid
    }

    /// Duration in ticks
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Whether the structure is open afterwards
    pub fn opening(&self) -> bool {
        self.opening
    }

    pub fn is_perpetual(&self) -> bool {
        self.plan.perpetual
    }
}

// ============================================================================
// Shared runtime state
// ============================================================================

/// State shared by every pipeline handle and the tick thread
pub(crate) struct RuntimeShared {
    pub(crate) world: WorldContext,
    pub(crate) config: RuntimeConfig,
    pub(crate) animation_config: Arc<AnimationConfig>,
    pub(crate) registry: AnimationRegistry,
    pub(crate) events: EventBus,
    pub(crate) hooks: AnimationHookManager,
}

impl RuntimeShared {
    /// Resolve, plan and announce a request
    pub(crate) fn prepare(&self, request: &ToggleRequest) -> Result<PreparedToggle> {
        let id = request.structure;
        let snapshot = self
            .world
            .store
            .snapshot(id)
            .ok_or(ToggleError::UnknownStructure(id))?;

        if snapshot.is_locked() && request.cause != ToggleCause::PerpetualMotion {
            return Err(ToggleError::Locked(id));
        }

        // Perpetual structures cycle without changing state
        if !snapshot.archetype().is_perpetual() {
            match (request.action, snapshot.is_open()) {
                (ToggleAction::Open, true) => {
                    return Err(ToggleError::AlreadyInState { id, open: true })
                }
                (ToggleAction::Close, false) => {
                    return Err(ToggleError::AlreadyInState { id, open: false })
                }
                _ => {}
            }
        }

        if let Some(limit) = self.config.max_block_count {
            let volume = snapshot.cuboid().volume();
            if volume > limit {
                return Err(ToggleError::TooBig { id, volume, limit });
            }
        }

        let plan =
            plan_motion(&snapshot).map_err(|source| ToggleError::InvalidDirection { id, source })?;
        let duration = animation_duration(
            snapshot.archetype(),
            &plan,
            request.time,
            &self.animation_config,
        );
        let opening = plan.opens(&snapshot);

        let prepared = PreparedToggle {
            request: request.clone(),
            snapshot: Arc::new(snapshot),
            plan,
            duration,
            opening,
        };

        if let EventVerdict::Cancel(reason) = self.events.prepare(&prepared) {
            return Err(ToggleError::Cancelled { id, reason });
        }

        tracing::debug!(
            "Prepared toggle of {} ({}) moving {} over {} ticks",
            id,
            prepared.snapshot.archetype().kind(),
            prepared.direction(),
            duration
        );
        Ok(prepared)
    }

    /// Log a failed request and tell the responsible actor
    pub(crate) fn reject(&self, request: &ToggleRequest, error: ToggleError) -> ToggleError {
        match &error {
            ToggleError::Busy(_) => tracing::debug!("Toggle rejected: {}", error),
            ToggleError::InvalidDirection { .. } | ToggleError::Animation { .. } => {
                tracing::error!("Toggle failed: {}", error)
            }
            _ => tracing::info!("Toggle rejected: {}", error),
        }

        match request.responsible {
            Some(actor) => {
                self.world
                    .notifier
                    .notify(actor, error.message_key(), &error.message_args());
            }
            None => tracing::debug!(
                "No responsible actor for {:?} toggle of {}",
                request.cause,
                request.structure
            ),
        }
        error
    }
}

impl std::fmt::Debug for RuntimeShared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeShared")
            .field("world", &self.world)
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("events", &self.events)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Entry point for toggle requests; cheap to clone and usable from any thread
#[derive(Clone, Debug)]
pub struct TogglePipeline {
    shared: Arc<RuntimeShared>,
    handle: TickHandle,
}

impl TogglePipeline {
    pub(crate) fn new(shared: Arc<RuntimeShared>, handle: TickHandle) -> Self {
        Self { shared, handle }
    }

    /// Submit a request
    ///
    /// Requests rejected before admission resolve immediately. Admitted ones
    /// resolve on the next tick.
    pub fn submit(&self, request: ToggleRequest) -> ToggleTicket {
        let prepared = match self.shared.prepare(&request) {
            Ok(prepared) => prepared,
            Err(error) => {
                let error = self.shared.reject(&request, error);
                return ToggleTicket::ready(error.result());
            }
        };

        let (reply, receiver) = mpsc::channel();
        let command = TickCommand::Admit {
            prepared: Box::new(prepared),
            reply: Some(reply),
        };
        if self.handle.send(command).is_err() {
            let error = self.shared.reject(&request, ToggleError::TickThreadGone);
            return ToggleTicket::ready(error.result());
        }
        ToggleTicket::pending(receiver)
    }

    /// Submit a request and block until the tick thread answers
    pub fn toggle(&self, request: ToggleRequest) -> ToggleResult {
        self.submit(request).wait()
    }

    pub fn handle(&self) -> &TickHandle {
        &self.handle
    }

    pub fn registry(&self) -> &AnimationRegistry {
        &self.shared.registry
    }

    pub fn world(&self) -> &WorldContext {
        &self.shared.world
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.shared.config
    }

    pub fn events(&self) -> &EventBus {
        &self.shared.events
    }
}
