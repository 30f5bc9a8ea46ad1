//! Errors reported by world boundary implementations

use crate::snapshot::StructureId;
use crate::world::ProxyHandle;
use glam::DVec3;
use thiserror::Error;

/// Failures of the entity proxy factory
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProxyError {
    /// The proxy could not be created
    #[error("failed to spawn proxy at {position}: {reason}")]
    Spawn { position: DVec3, reason: String },

    /// The proxy no longer exists
    #[error("proxy {0:?} no longer exists")]
    Missing(ProxyHandle),

    /// The proxy exists but refused to move
    #[error("failed to move proxy {handle:?}: {reason}")]
    Move { handle: ProxyHandle, reason: String },
}

/// Failures of the structure store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No structure with this id is stored
    #[error("structure {0} not found")]
    NotFound(StructureId),

    /// Writing the new geometry failed
    #[error("failed to write structure {id}: {reason}")]
    Write { id: StructureId, reason: String },
}
