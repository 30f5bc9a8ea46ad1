//! World boundary
//!
//! The engine never touches the host world directly. Everything it needs goes
//! through the narrow traits in this module, bundled into a [`WorldContext`]
//! that is cloned into every animator.
//!
//! All traits are `Send + Sync` so a single context can be shared between the
//! request side and the tick thread. Implementations are expected to be
//! idempotent where noted: placing the same block twice, or clearing an empty
//! cell, must not fail.

use crate::cuboid::Cuboid;
use crate::error::{ProxyError, StoreError};
use crate::math::Rotation;
use crate::snapshot::{StructureId, StructureSnapshot};
use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Identifiers
// ============================================================================

/// A player or other entity that can receive notifications
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

/// Opaque handle to a spawned block proxy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProxyHandle(pub u64);

/// The block occupying a cell
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockDescriptor {
    /// Host-specific block identifier, e.g. `oak_planks`
    pub id: String,
    /// Whether the block's own orientation follows the structure's rotation
    #[serde(default)]
    pub can_rotate: bool,
}

impl BlockDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            can_rotate: false,
        }
    }

    pub fn rotatable(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            can_rotate: true,
        }
    }
}

// ============================================================================
// Boundary traits
// ============================================================================

/// Outcome of checking whether a region's chunks are available
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkStatus {
    /// Every chunk is loaded
    Pass,
    /// Some chunks must be loaded first
    RequiredLoad,
    /// The region cannot be used
    Fail,
}

pub trait ChunkGate: Send + Sync {
    fn check_region_loaded(&self, region: &Cuboid) -> ChunkStatus;

    /// Try to load the chunks of `region`, returning whether it is now usable
    fn load_region(&self, _region: &Cuboid) -> bool {
        false
    }
}

pub trait BlockSource: Send + Sync {
    /// The block at `position`, or `None` for air
    fn block_at(&self, position: IVec3) -> Option<BlockDescriptor>;
}

pub trait BlockSink: Send + Sync {
    fn place_block(&self, position: IVec3, block: &BlockDescriptor, rotation: Rotation);
    fn clear_block(&self, position: IVec3);
}

pub trait ProxyFactory: Send + Sync {
    fn spawn_proxy(
        &self,
        position: DVec3,
        block: &BlockDescriptor,
        rotation: Rotation,
    ) -> Result<ProxyHandle, ProxyError>;

    fn despawn_proxy(&self, handle: ProxyHandle);

    /// Move a proxy instantly
    fn teleport_proxy(
        &self,
        handle: ProxyHandle,
        position: DVec3,
        rotation: Rotation,
    ) -> Result<(), ProxyError>;

    /// Move a proxy towards `position` over one tick
    ///
    /// Hosts without interpolated movement can rely on the teleporting default.
    fn step_proxy(
        &self,
        handle: ProxyHandle,
        position: DVec3,
        rotation: Rotation,
    ) -> Result<(), ProxyError> {
        self.teleport_proxy(handle, position, rotation)
    }
}

pub trait SoundSink: Send + Sync {
    fn play_sound(&self, position: DVec3, sound: &str, volume: f32, pitch: f32);
}

pub trait ActorNotifier: Send + Sync {
    /// Deliver a localized message identified by a stable `key`
    fn notify(&self, actor: ActorId, key: &str, args: &[String]);
}

/// New geometry written back once a toggle finishes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StructureCommit {
    pub id: StructureId,
    pub cuboid: Cuboid,
    pub is_open: bool,
}

pub trait StructureStore: Send + Sync {
    fn snapshot(&self, id: StructureId) -> Option<StructureSnapshot>;
    fn commit(&self, commit: &StructureCommit) -> Result<(), StoreError>;
}

// ============================================================================
// Context
// ============================================================================

/// Every boundary the engine talks to
#[derive(Clone)]
pub struct WorldContext {
    pub chunks: Arc<dyn ChunkGate>,
    pub blocks: Arc<dyn BlockSource>,
    pub sink: Arc<dyn BlockSink>,
    pub proxies: Arc<dyn ProxyFactory>,
    pub sounds: Arc<dyn SoundSink>,
    pub notifier: Arc<dyn ActorNotifier>,
    pub store: Arc<dyn StructureStore>,
}

impl WorldContext {
    /// Build a context where one value implements every boundary
    pub fn from_shared<W>(world: Arc<W>) -> Self
    where
        W: ChunkGate
            + BlockSource
            + BlockSink
            + ProxyFactory
            + SoundSink
            + ActorNotifier
            + StructureStore
            + 'static,
    {
        Self {
            chunks: world.clone(),
            blocks: world.clone(),
            sink: world.clone(),
            proxies: world.clone(),
            sounds: world.clone(),
            notifier: world.clone(),
            store: world,
        }
    }

    /// Replace the chunk gate
    pub fn with_chunks(mut self, chunks: Arc<dyn ChunkGate>) -> Self {
        self.chunks = chunks;
        self
    }

    /// Replace the structure store
    pub fn with_store(mut self, store: Arc<dyn StructureStore>) -> Self {
        self.store = store;
        self
    }
}

impl std::fmt::Debug for WorldContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldContext").finish_non_exhaustive()
    }
}
