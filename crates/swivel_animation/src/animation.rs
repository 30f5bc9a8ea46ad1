//! Animation progress and lifecycle

use crate::block::AnimatedBlock;
use crate::error::{AnimationError, Result};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::sync::Arc;
use swivel_core::math::resting_cell;
use swivel_core::{Cuboid, StructureSnapshot};

/// Lifecycle state of an animation
///
/// ```text
/// Pending ──► Active ──► Finishing ──► Completed
///    │
///    └──────► Skipped
/// ```
///
/// `Completed` and `Skipped` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationState {
    /// Blocks are materialized but nothing has moved yet
    Pending,
    /// Proxies are advancing once per tick
    Active,
    /// Every step ran; proxies settle on the next tick
    Finishing,
    /// Blocks are at rest in their final cells
    Completed,
    /// No animation ran; final cells were placed directly
    Skipped,
}

impl AnimationState {
    pub fn can_transition_to(self, next: AnimationState) -> bool {
        use AnimationState::*;
        matches!(
            (self, next),
            (Pending, Active) | (Pending, Skipped) | (Active, Finishing) | (Finishing, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AnimationState::Completed | AnimationState::Skipped)
    }
}

/// What an animation is allowed to do to the world
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationType {
    /// Move the blocks and commit the new geometry
    #[default]
    MoveBlocks,
    /// Move proxies only; the world and the structure are left untouched
    Preview,
}

/// Read-only view of one in-flight animation
///
/// Owned by its [`Animator`](crate::Animator); hooks and observers only ever
/// see a shared reference.
#[derive(Debug)]
pub struct Animation {
    snapshot: Arc<StructureSnapshot>,
    new_cuboid: Cuboid,
    animation_type: AnimationType,
    duration: u32,
    steps_executed: u32,
    state: AnimationState,
    blocks: Vec<AnimatedBlock>,
    region: OnceCell<Cuboid>,
}

impl Animation {
    /// Create a pending animation lasting at least one tick
    pub fn new(
        snapshot: Arc<StructureSnapshot>,
        new_cuboid: Cuboid,
        duration: u32,
        animation_type: AnimationType,
    ) -> Self {
        Self {
            snapshot,
            new_cuboid,
            animation_type,
            duration: duration.max(1),
            steps_executed: 0,
            state: AnimationState::Pending,
            blocks: Vec::new(),
            region: OnceCell::new(),
        }
    }

    pub fn snapshot(&self) -> &Arc<StructureSnapshot> {
        &self.snapshot
    }

    /// Geometry the structure will have once the animation completes
    pub fn new_cuboid(&self) -> Cuboid {
        self.new_cuboid
    }

    pub fn animation_type(&self) -> AnimationType {
        self.animation_type
    }

    pub fn is_preview(&self) -> bool {
        self.animation_type == AnimationType::Preview
    }

    /// Total number of steps, in ticks
    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn steps_executed(&self) -> u32 {
        self.steps_executed
    }

    pub fn ticks_remaining(&self) -> u32 {
        self.duration - self.steps_executed
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn blocks(&self) -> &[AnimatedBlock] {
        &self.blocks
    }

    /// Cells currently covered by the moving blocks
    ///
    /// Computed on first access after each step. Falls back to the snapshot's
    /// cuboid while there are no blocks.
    pub fn region(&self) -> Cuboid {
        *self.region.get_or_init(|| {
            Cuboid::bounding(self.blocks.iter().map(|b| resting_cell(b.current_position())))
                .unwrap_or_else(|| self.snapshot.cuboid())
        })
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [AnimatedBlock] {
        &mut self.blocks
    }

    pub(crate) fn set_blocks(&mut self, blocks: Vec<AnimatedBlock>) {
        self.blocks = blocks;
        self.invalidate_region();
    }

    pub(crate) fn invalidate_region(&mut self) {
        self.region.take();
    }

    /// Count one executed step, returning the new total
    pub(crate) fn record_step(&mut self) -> u32 {
        self.steps_executed = (self.steps_executed + 1).min(self.duration);
        self.steps_executed
    }

    pub(crate) fn transition(&mut self, next: AnimationState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(AnimationError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(
            "Animation of {} {:?} -> {:?}",
            self.snapshot.id(),
            self.state,
            next
        );
        self.state = next;
        Ok(())
    }
}
