//! Toggle error types

use crate::request::ToggleResult;
use swivel_animation::{AnimationError, MotionError};
use swivel_core::StructureId;
use thiserror::Error;

/// Reasons a toggle request does not run to success
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToggleError {
    #[error("structure {0} does not exist")]
    UnknownStructure(StructureId),

    #[error("structure {0} is locked")]
    Locked(StructureId),

    #[error("structure {id} is already {}", state_name(.open))]
    AlreadyInState { id: StructureId, open: bool },

    #[error("structure {id}: {source}")]
    InvalidDirection {
        id: StructureId,
        #[source]
        source: MotionError,
    },

    #[error("structure {id} has {volume} blocks, more than the limit of {limit}")]
    TooBig {
        id: StructureId,
        volume: u64,
        limit: u64,
    },

    #[error("toggle of structure {id} was cancelled: {reason}")]
    Cancelled { id: StructureId, reason: String },

    #[error("structure {0} is already animating")]
    Busy(StructureId),

    #[error("chunks around structure {0} are not available")]
    ChunkUnavailable(StructureId),

    #[error("animation of structure {id} failed: {source}")]
    Animation {
        id: StructureId,
        #[source]
        source: AnimationError,
    },

    #[error("the tick thread is no longer running")]
    TickThreadGone,
}

impl ToggleError {
    /// Result code reported for this error
    pub fn result(&self) -> ToggleResult {
        match self {
            ToggleError::Locked(_) => ToggleResult::Locked,
            ToggleError::AlreadyInState { .. } => ToggleResult::NoChange,
            ToggleError::TooBig { .. } => ToggleResult::TooBig,
            ToggleError::Cancelled { .. } => ToggleResult::Cancelled,
            ToggleError::Busy(_) => ToggleResult::Busy,
            ToggleError::UnknownStructure(_)
            | ToggleError::InvalidDirection { .. }
            | ToggleError::ChunkUnavailable(_)
            | ToggleError::Animation { .. }
            | ToggleError::TickThreadGone => ToggleResult::Error,
        }
    }

    /// Stable key of the message sent to the responsible actor
    pub fn message_key(&self) -> &'static str {
        match self {
            ToggleError::UnknownStructure(_) => "toggle.error.unknown_structure",
            ToggleError::Locked(_) => "toggle.locked",
            ToggleError::AlreadyInState { open: true, .. } => "toggle.already_open",
            ToggleError::AlreadyInState { open: false, .. } => "toggle.already_closed",
            ToggleError::InvalidDirection {
                source: MotionError::OutOfRange { .. },
                ..
            } => "toggle.error.out_of_range",
            ToggleError::InvalidDirection { .. } => "toggle.error.invalid_direction",
            ToggleError::TooBig { .. } => "toggle.too_big",
            ToggleError::Cancelled { .. } => "toggle.cancelled",
            ToggleError::Busy(_) => "toggle.busy",
            ToggleError::ChunkUnavailable(_) => "toggle.error.chunks_unavailable",
            ToggleError::Animation { .. } => "toggle.error.animation",
            ToggleError::TickThreadGone => "toggle.error.tick_thread",
        }
    }

    /// Arguments substituted into the actor's message
    pub fn message_args(&self) -> Vec<String> {
        match self {
            ToggleError::UnknownStructure(id)
            | ToggleError::Locked(id)
            | ToggleError::AlreadyInState { id, .. }
            | ToggleError::Busy(id)
            | ToggleError::ChunkUnavailable(id)
            | ToggleError::Animation { id, .. } => vec![id.to_string()],
            ToggleError::InvalidDirection { id, source } => match source {
                MotionError::InvalidDirection { direction, .. }
                | MotionError::OutOfRange { direction, .. } => {
                    vec![id.to_string(), direction.to_string()]
                }
            },
            ToggleError::TooBig { id, volume, limit } => {
                vec![id.to_string(), volume.to_string(), limit.to_string()]
            }
            ToggleError::Cancelled { id, reason } => vec![id.to_string(), reason.clone()],
            ToggleError::TickThreadGone => Vec::new(),
        }
    }
}

fn state_name(open: &bool) -> &'static str {
    if *open {
        "open"
    } else {
        "closed"
    }
}

/// Result type for toggle operations
pub type Result<T> = std::result::Result<T, ToggleError>;
