//! In-memory world
//!
//! [`HeadlessWorld`] implements every boundary trait over plain maps and counts
//! each call, so the CLI can simulate toggles without a host and tests can
//! assert on exactly what the engine did to the world.

use crate::cuboid::Cuboid;
use crate::error::{ProxyError, StoreError};
use crate::math::{resting_cell, Rotation};
use crate::snapshot::{StructureId, StructureSnapshot};
use crate::world::{
    ActorId, ActorNotifier, BlockDescriptor, BlockSink, BlockSource, ChunkGate, ChunkStatus,
    ProxyFactory, ProxyHandle, SoundSink, StructureCommit, StructureStore,
};
use glam::{DVec3, IVec3};
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Call counters of a [`HeadlessWorld`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    pub chunk_checks: u64,
    pub chunk_loads: u64,
    pub blocks_placed: u64,
    pub blocks_cleared: u64,
    pub proxies_spawned: u64,
    pub proxies_despawned: u64,
    pub spawn_failures: u64,
    pub teleports: u64,
    pub steps: u64,
    pub commits: u64,
}

/// A message delivered to an actor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub actor: ActorId,
    pub key: String,
    pub args: Vec<String>,
}

/// A sound played in the world
#[derive(Clone, Debug, PartialEq)]
pub struct PlayedSound {
    pub position: DVec3,
    pub sound: String,
    pub volume: f32,
    pub pitch: f32,
}

#[derive(Clone, Debug)]
struct Proxy {
    position: DVec3,
    rotation: Rotation,
}

#[derive(Debug)]
struct State {
    blocks: FxHashMap<IVec3, BlockDescriptor>,
    proxies: FxHashMap<ProxyHandle, Proxy>,
    next_proxy: u64,
    structures: FxHashMap<StructureId, StructureSnapshot>,
    notifications: Vec<Notification>,
    sounds: Vec<PlayedSound>,
    chunk_status: ChunkStatus,
    loadable: bool,
    failing_spawns: FxHashSet<IVec3>,
    failing_commits: FxHashSet<StructureId>,
    stats: HeadlessStats,
}

/// In-memory implementation of every world boundary
#[derive(Debug)]
pub struct HeadlessWorld {
    state: Mutex<State>,
}

impl Default for HeadlessWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessWorld {
    /// Create an empty world whose chunks are always loaded
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                blocks: FxHashMap::default(),
                proxies: FxHashMap::default(),
                next_proxy: 1,
                structures: FxHashMap::default(),
                notifications: Vec::new(),
                sounds: Vec::new(),
                chunk_status: ChunkStatus::Pass,
                loadable: false,
                failing_spawns: FxHashSet::default(),
                failing_commits: FxHashSet::default(),
                stats: HeadlessStats::default(),
            }),
        }
    }

    // ========================================================================
    // Setup
    // ========================================================================

    pub fn set_block(&self, position: IVec3, block: BlockDescriptor) {
        self.state.lock().blocks.insert(position, block);
    }

    /// Fill every cell of `cuboid` with `block`
    pub fn fill(&self, cuboid: &Cuboid, block: &BlockDescriptor) {
        let mut state = self.state.lock();
        for position in cuboid.positions() {
            state.blocks.insert(position, block.clone());
        }
    }

    /// Register a structure and fill its cuboid with `block`
    pub fn insert_structure(&self, snapshot: StructureSnapshot, block: &BlockDescriptor) {
        self.fill(&snapshot.cuboid(), block);
        self.state.lock().structures.insert(snapshot.id(), snapshot);
    }

    /// Register a structure without touching its blocks
    pub fn insert_snapshot(&self, snapshot: StructureSnapshot) {
        self.state.lock().structures.insert(snapshot.id(), snapshot);
    }

    pub fn set_chunk_status(&self, status: ChunkStatus) {
        self.state.lock().chunk_status = status;
    }

    /// Whether `load_region` succeeds when chunks still need loading
    pub fn set_loadable(&self, loadable: bool) {
        self.state.lock().loadable = loadable;
    }

    /// Make proxy spawns fail for the block resting at `position`
    pub fn fail_spawn_at(&self, position: IVec3) {
        self.state.lock().failing_spawns.insert(position);
    }

    pub fn fail_commit_for(&self, id: StructureId) {
        self.state.lock().failing_commits.insert(id);
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn stats(&self) -> HeadlessStats {
        self.state.lock().stats.clone()
    }

    pub fn block(&self, position: IVec3) -> Option<BlockDescriptor> {
        self.state.lock().blocks.get(&position).cloned()
    }

    /// Number of non-air cells
    pub fn block_count(&self) -> usize {
        self.state.lock().blocks.len()
    }

    /// Number of non-air cells inside `cuboid`
    pub fn blocks_in(&self, cuboid: &Cuboid) -> usize {
        let state = self.state.lock();
        cuboid
            .positions()
            .filter(|p| state.blocks.contains_key(p))
            .count()
    }

    pub fn structure(&self, id: StructureId) -> Option<StructureSnapshot> {
        self.state.lock().structures.get(&id).cloned()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.lock().notifications.clone()
    }

    pub fn sounds(&self) -> Vec<PlayedSound> {
        self.state.lock().sounds.clone()
    }

    /// Number of proxies currently alive
    pub fn live_proxies(&self) -> usize {
        self.state.lock().proxies.len()
    }

    pub fn proxy_position(&self, handle: ProxyHandle) -> Option<DVec3> {
        self.state.lock().proxies.get(&handle).map(|p| p.position)
    }

    pub fn proxy_rotation(&self, handle: ProxyHandle) -> Option<Rotation> {
        self.state.lock().proxies.get(&handle).map(|p| p.rotation)
    }
}

impl ChunkGate for HeadlessWorld {
    fn check_region_loaded(&self, _region: &Cuboid) -> ChunkStatus {
        let mut state = self.state.lock();
        state.stats.chunk_checks += 1;
        state.chunk_status
    }

    fn load_region(&self, region: &Cuboid) -> bool {
        let mut state = self.state.lock();
        state.stats.chunk_loads += 1;
        if state.loadable {
            debug!("Loaded chunks for {}", region);
            state.chunk_status = ChunkStatus::Pass;
        }
        state.loadable
    }
}

impl BlockSource for HeadlessWorld {
    fn block_at(&self, position: IVec3) -> Option<BlockDescriptor> {
        self.block(position)
    }
}

impl BlockSink for HeadlessWorld {
    fn place_block(&self, position: IVec3, block: &BlockDescriptor, _rotation: Rotation) {
        let mut state = self.state.lock();
        state.stats.blocks_placed += 1;
        state.blocks.insert(position, block.clone());
    }

    fn clear_block(&self, position: IVec3) {
        let mut state = self.state.lock();
        state.stats.blocks_cleared += 1;
        state.blocks.remove(&position);
    }
}

impl ProxyFactory for HeadlessWorld {
    fn spawn_proxy(
        &self,
        position: DVec3,
        _block: &BlockDescriptor,
        rotation: Rotation,
    ) -> Result<ProxyHandle, ProxyError> {
        let mut state = self.state.lock();
        if state.failing_spawns.contains(&resting_cell(position)) {
            state.stats.spawn_failures += 1;
            return Err(ProxyError::Spawn {
                position,
                reason: "spawn rejected by headless world".to_string(),
            });
        }
        let handle = ProxyHandle(state.next_proxy);
        state.next_proxy += 1;
        state.stats.proxies_spawned += 1;
        state.proxies.insert(
            handle,
            Proxy {
                position,
                rotation,
            },
        );
        Ok(handle)
    }

    fn despawn_proxy(&self, handle: ProxyHandle) {
        let mut state = self.state.lock();
        if state.proxies.remove(&handle).is_some() {
            state.stats.proxies_despawned += 1;
        }
    }

    fn teleport_proxy(
        &self,
        handle: ProxyHandle,
        position: DVec3,
        rotation: Rotation,
    ) -> Result<(), ProxyError> {
        let mut state = self.state.lock();
        let proxy = state
            .proxies
            .get_mut(&handle)
            .ok_or(ProxyError::Missing(handle))?;
        proxy.position = position;
        proxy.rotation = rotation;
        state.stats.teleports += 1;
        Ok(())
    }

    fn step_proxy(
        &self,
        handle: ProxyHandle,
        position: DVec3,
        rotation: Rotation,
    ) -> Result<(), ProxyError> {
        let mut state = self.state.lock();
        let proxy = state
            .proxies
            .get_mut(&handle)
            .ok_or(ProxyError::Missing(handle))?;
        proxy.position = position;
        proxy.rotation = rotation;
        state.stats.steps += 1;
        Ok(())
    }
}

impl SoundSink for HeadlessWorld {
    fn play_sound(&self, position: DVec3, sound: &str, volume: f32, pitch: f32) {
        self.state.lock().sounds.push(PlayedSound {
            position,
            sound: sound.to_string(),
            volume,
            pitch,
        });
    }
}

impl ActorNotifier for HeadlessWorld {
    fn notify(&self, actor: ActorId, key: &str, args: &[String]) {
        self.state.lock().notifications.push(Notification {
            actor,
            key: key.to_string(),
            args: args.to_vec(),
        });
    }
}

impl StructureStore for HeadlessWorld {
    fn snapshot(&self, id: StructureId) -> Option<StructureSnapshot> {
        self.structure(id)
    }

    fn commit(&self, commit: &StructureCommit) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if state.failing_commits.contains(&commit.id) {
            return Err(StoreError::Write {
                id: commit.id,
                reason: "commit rejected by headless world".to_string(),
            });
        }
        let snapshot = state
            .structures
            .get(&commit.id)
            .ok_or(StoreError::NotFound(commit.id))?
            .with_geometry(commit.cuboid, commit.is_open);
        state.structures.insert(commit.id, snapshot);
        state.stats.commits += 1;
        Ok(())
    }
}
