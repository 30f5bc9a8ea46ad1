//! Tick executor
//!
//! Owns every running [`Animator`] and drives them once per world tick.
//! Animators cannot leave the thread that created them, so the executor is
//! built on the tick thread and reached from elsewhere through a
//! [`TickHandle`].

use crate::error::{Result, ToggleError};
use crate::pipeline::{PreparedToggle, RuntimeShared};
use crate::registry::AdmissionSlot;
use crate::request::{ToggleCause, ToggleRequest, ToggleResult};
use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use swivel_animation::{create_component, Animation, AnimationState, Animator};
use swivel_core::{ChunkStatus, StructureCommit, StructureId, TickBound};

new_key_type! {
    /// Key of a running animation
    pub struct AnimationId;
}

/// Messages sent to the tick thread
#[derive(Debug)]
pub(crate) enum TickCommand {
    Admit {
        prepared: Box<PreparedToggle>,
        reply: Option<Sender<ToggleResult>>,
    },
    StopPerpetual(StructureId),
    Shutdown,
}

// ============================================================================
// Handle
// ============================================================================

/// Sends control messages to the tick thread
#[derive(Clone, Debug)]
pub struct TickHandle {
    sender: Sender<TickCommand>,
}

impl TickHandle {
    pub(crate) fn new(sender: Sender<TickCommand>) -> Self {
        Self { sender }
    }

    pub(crate) fn send(&self, command: TickCommand) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|_| ToggleError::TickThreadGone)
    }

    /// Stop re-issuing cycles of a perpetual structure
    ///
    /// The running cycle still finishes. A later non-perpetual request for
    /// the structure starts it again.
    pub fn stop_perpetual(&self, id: StructureId) -> Result<()> {
        self.send(TickCommand::StopPerpetual(id))
    }

    /// Finish every running animation and stop the tick loop
    pub fn shutdown(&self) -> Result<()> {
        self.send(TickCommand::Shutdown)
    }
}

// ============================================================================
// Executor
// ============================================================================

struct ActiveToggle {
    animator: Animator,
    // Released once the toggle is completed
    slot: AdmissionSlot,
    prepared: PreparedToggle,
}

/// Single-threaded owner of all running animations
pub struct TickExecutor {
    shared: Arc<RuntimeShared>,
    commands: Receiver<TickCommand>,
    active: SlotMap<AnimationId, ActiveToggle>,
    stopped: FxHashSet<StructureId>,
    shutting_down: bool,
    ticks: u64,
    _tick: TickBound,
}

impl TickExecutor {
    pub(crate) fn new(shared: Arc<RuntimeShared>, commands: Receiver<TickCommand>) -> Self {
        Self {
            shared,
            commands,
            active: SlotMap::with_key(),
            stopped: FxHashSet::default(),
            shutting_down: false,
            ticks: 0,
            _tick: TickBound::default(),
        }
    }

    /// Number of running animations
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Ticks executed so far
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutting_down
    }

    /// Run one world tick
    ///
    /// Admits queued requests, then advances every running animation by one
    /// step. Returns `false` once the executor has been told to shut down or
    /// every sender is gone.
    pub fn tick(&mut self) -> bool {
        if self.shutting_down {
            // Answer requests that arrived after shutdown
            self.shutdown();
            return false;
        }
        if !self.drain_commands() {
            return false;
        }
        self.step_animations();
        self.ticks += 1;
        true
    }

    /// Tick at the configured rate until shut down
    pub fn run(mut self) {
        let tick_rate = self.shared.animation_config.tick_rate.max(1);
        let tick_duration = Duration::from_micros(1_000_000 / u64::from(tick_rate));
        tracing::debug!("Tick loop started at {} ticks per second", tick_rate);

        loop {
            let start = Instant::now();
            if !self.tick() {
                break;
            }
            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                thread::sleep(tick_duration - elapsed);
            }
        }

        self.shutdown();
        tracing::debug!("Tick loop stopped after {} ticks", self.ticks);
    }

    /// Force every running animation to finish and commit it
    ///
    /// Requests still queued are answered with [`ToggleResult::Cancelled`].
    /// Perpetual structures are not restarted.
    pub fn shutdown(&mut self) {
        if !self.shutting_down {
            tracing::debug!(
                "Shutting down with {} running animations",
                self.active.len()
            );
        }
        self.shutting_down = true;

        while let Ok(command) = self.commands.try_recv() {
            self.handle_command(command);
        }

        let ids: Vec<AnimationId> = self.active.keys().collect();
        for id in ids {
            if let Some(mut toggle) = self.active.remove(id) {
                if let Err(err) = toggle.animator.force_finish() {
                    tracing::warn!("Failed to finish animation of {}: {}", toggle.prepared.id(), err);
                }
                self.complete(toggle);
            }
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    fn drain_commands(&mut self) -> bool {
        loop {
            match self.commands.try_recv() {
                Ok(TickCommand::Shutdown) => {
                    self.shutdown();
                    return false;
                }
                Ok(command) => self.handle_command(command),
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn handle_command(&mut self, command: TickCommand) {
        match command {
            TickCommand::Admit { prepared, reply } => {
                let result = if self.shutting_down {
                    let error = ToggleError::Cancelled {
                        id: prepared.id(),
                        reason: "shutting down".to_string(),
                    };
                    self.shared.reject(prepared.request(), error).result()
                } else {
                    match self.admit(*prepared) {
                        Ok(()) => ToggleResult::Success,
                        Err(err) => err.result(),
                    }
                };
                if let Some(reply) = reply {
                    // The requester may have dropped its ticket
                    let _ = reply.send(result);
                }
            }
            TickCommand::StopPerpetual(id) => {
                tracing::debug!("Perpetual motion of {} stops after this cycle", id);
                self.stopped.insert(id);
            }
            TickCommand::Shutdown => self.shutting_down = true,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Admission, chunk check, animator construction and start
    fn admit(&mut self, prepared: PreparedToggle) -> Result<()> {
        let id = prepared.id();
        let request = prepared.request();

        let Some(slot) = self.shared.registry.try_acquire(id) else {
            return Err(self.shared.reject(request, ToggleError::Busy(id)));
        };
        // The structure moved after this request was prepared
        if self.is_stale(&prepared) {
            return Err(self.shared.reject(request, ToggleError::Busy(id)));
        }

        let region = prepared.snapshot().cuboid().union(&prepared.new_cuboid());
        let chunks = &self.shared.world.chunks;
        let loaded = match chunks.check_region_loaded(&region) {
            ChunkStatus::Pass => true,
            ChunkStatus::RequiredLoad => chunks.load_region(&region),
            ChunkStatus::Fail => false,
        };
        if !loaded {
            return Err(self.shared.reject(request, ToggleError::ChunkUnavailable(id)));
        }

        if request.cause != ToggleCause::PerpetualMotion && self.stopped.remove(&id) {
            tracing::debug!("Perpetual motion of {} resumes", id);
        }

        let config = &self.shared.animation_config;
        let component = create_component(
            prepared.snapshot(),
            prepared.plan(),
            prepared.duration(),
            config,
        );
        let animation = Animation::new(
            Arc::clone(prepared.snapshot()),
            prepared.new_cuboid(),
            prepared.duration(),
            request.animation_type,
        );
        let mut animator = Animator::new(
            animation,
            component,
            &self.shared.hooks,
            self.shared.world.clone(),
            config,
        );

        let blocks = animator.prepare_animation();
        let skip = request.skip_animation || self.shared.config.skip_animations;
        let state = match animator.start_animation(skip) {
            Ok(state) => state,
            Err(source) => {
                return Err(self
                    .shared
                    .reject(request, ToggleError::Animation { id, source }))
            }
        };
        slot.set_state(state);
        self.shared.events.start(&prepared);

        tracing::debug!(
            "Started animation of {} with {} blocks over {} ticks ({:?})",
            id,
            blocks,
            prepared.duration(),
            state
        );

        let toggle = ActiveToggle {
            animator,
            slot,
            prepared,
        };
        if state.is_terminal() {
            self.complete(toggle);
        } else {
            self.active.insert(toggle);
        }
        Ok(())
    }

    fn is_stale(&self, prepared: &PreparedToggle) -> bool {
        match self.shared.world.store.snapshot(prepared.id()) {
            Some(current) => {
                current.cuboid() != prepared.snapshot().cuboid()
                    || current.is_open() != prepared.snapshot().is_open()
            }
            None => true,
        }
    }

    fn step_animations(&mut self) {
        let mut finished = Vec::new();
        for (key, toggle) in self.active.iter_mut() {
            let state = match toggle.animator.tick() {
                Ok(state) => state,
                Err(err) => {
                    tracing::warn!("Animation of {} failed: {}", toggle.prepared.id(), err);
                    toggle
                        .animator
                        .force_finish()
                        .unwrap_or(AnimationState::Completed)
                }
            };
            toggle.slot.set_state(state);
            if state.is_terminal() {
                finished.push(key);
            }
        }

        for key in finished {
            if let Some(toggle) = self.active.remove(key) {
                self.complete(toggle);
            }
        }
    }

    /// Commit geometry, announce the end, release the slot and restart
    /// perpetual structures
    fn complete(&mut self, toggle: ActiveToggle) {
        let ActiveToggle {
            animator,
            slot,
            prepared,
        } = toggle;
        let id = prepared.id();
        let state = animator.state();

        if !animator.animation().is_preview() {
            let commit = StructureCommit {
                id,
                cuboid: prepared.new_cuboid(),
                is_open: prepared.opening(),
            };
            match self.shared.world.store.commit(&commit) {
                Ok(()) => tracing::debug!("Committed {} at {}", id, commit.cuboid),
                Err(err) => tracing::error!("Failed to commit {}: {}", id, err),
            }
        }

        self.shared.events.end(&prepared, state);
        drop(animator);
        drop(slot);

        // A skipped cycle would restart within the same tick forever
        let restart = prepared.is_perpetual()
            && state == AnimationState::Completed
            && !self.shutting_down
            && !self.stopped.contains(&id);
        if restart {
            self.restart_perpetual(prepared.request());
        }
    }

    fn restart_perpetual(&mut self, previous: &ToggleRequest) {
        let mut request = ToggleRequest::new(previous.structure, ToggleCause::PerpetualMotion)
            .with_responsible(previous.responsible)
            .with_animation_type(previous.animation_type);
        request.time = previous.time;

        let prepared = match self.shared.prepare(&request) {
            Ok(prepared) => prepared,
            Err(err) => {
                self.shared.reject(&request, err);
                return;
            }
        };
        // Failures are already reported
        let _ = self.admit(prepared);
    }
}

impl std::fmt::Debug for TickExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickExecutor")
            .field("active", &self.active.len())
            .field("stopped", &self.stopped.len())
            .field("shutting_down", &self.shutting_down)
            .field("ticks", &self.ticks)
            .finish()
    }
}
