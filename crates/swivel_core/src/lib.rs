//! Swivel Core
//!
//! Foundational types shared by the structure animation engine:
//!
//! - **Geometry**: integer cuboids, flattened footprints and rotation math
//! - **Directions**: the movement directions a structure can open towards
//! - **Snapshots**: immutable captures of a structure taken when a toggle is admitted
//! - **World boundary**: the narrow traits through which the engine touches chunks,
//!   blocks, proxies, sounds, actors and the structure store
//! - **Headless world**: an in-memory implementation of every boundary trait
//!
//! # Example
//!
//! ```rust
//! use swivel_core::{Cuboid, IVec3};
//!
//! let door = Cuboid::new(IVec3::new(0, 64, 0), IVec3::new(0, 66, 3));
//! assert_eq!(door.dimensions(), IVec3::new(1, 3, 4));
//! assert_eq!(door.volume(), 12);
//! ```

pub mod cuboid;
pub mod direction;
pub mod error;
pub mod headless;
pub mod math;
pub mod snapshot;
pub mod tick;
pub mod world;

pub use cuboid::{Cuboid, Footprint};
pub use direction::MovementDirection;
pub use error::{ProxyError, StoreError};
pub use headless::{HeadlessStats, HeadlessWorld, Notification, PlayedSound};
pub use math::{Axis, Rotation, FINAL_POSITION_TOLERANCE};
pub use snapshot::{Archetype, ArchetypeKind, StructureId, StructureSnapshot};
pub use tick::{TickBound, DEFAULT_TICK_RATE};
pub use world::{
    ActorId, ActorNotifier, BlockDescriptor, BlockSink, BlockSource, ChunkGate, ChunkStatus,
    ProxyFactory, ProxyHandle, SoundSink, StructureCommit, StructureStore, WorldContext,
};

// Re-export the vector types used throughout the public API
pub use glam::{DVec3, IVec2, IVec3};
