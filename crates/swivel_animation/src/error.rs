//! Animation error types

use crate::animation::AnimationState;
use swivel_core::{ArchetypeKind, MovementDirection};
use thiserror::Error;

/// Failures while planning a structure's movement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MotionError {
    /// The archetype cannot move in the requested direction
    #[error("{archetype} cannot move {direction}")]
    InvalidDirection {
        archetype: ArchetypeKind,
        direction: MovementDirection,
    },

    /// The movement would carry the structure past the edge of block coordinates
    #[error("{archetype} cannot move {direction} that far")]
    OutOfRange {
        archetype: ArchetypeKind,
        direction: MovementDirection,
    },
}

/// Failures of the animation lifecycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    /// A lifecycle transition that the state machine does not allow
    #[error("invalid animation transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: AnimationState,
        to: AnimationState,
    },
}

/// Error returned by a hook callback
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HookError(pub String);

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result type for animation lifecycle operations
pub type Result<T> = std::result::Result<T, AnimationError>;
