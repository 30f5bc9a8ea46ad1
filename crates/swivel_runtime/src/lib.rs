//! Swivel Runtime
//!
//! Turns toggle requests into running animations.
//!
//! # Features
//!
//! - **Toggle pipeline**: requests from any thread are resolved and planned on
//!   the caller, then admitted on the tick thread
//! - **Admission registry**: at most one animation per structure; a second
//!   request is answered `Busy`, never queued
//! - **Tick executor**: single-threaded owner of every animator, driven at the
//!   world tick rate
//! - **Events**: cancellable prepare, start and end notifications
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use swivel_core::{
//!     Archetype, BlockDescriptor, Cuboid, HeadlessWorld, IVec3, MovementDirection, StructureId,
//!     StructureSnapshot, WorldContext,
//! };
//! use swivel_runtime::{RuntimeBuilder, RuntimeConfig, ToggleCause, ToggleRequest, ToggleResult};
//!
//! let world = Arc::new(HeadlessWorld::new());
//! world.insert_structure(
//!     StructureSnapshot::new(
//!         StructureId(1),
//!         "lift",
//!         Archetype::Elevator { blocks_to_move: 2 },
//!         Cuboid::new(IVec3::new(0, 64, 0), IVec3::new(2, 64, 2)),
//!         IVec3::new(1, 64, 1),
//!         MovementDirection::Up,
//!     ),
//!     &BlockDescriptor::new("stone"),
//! );
//!
//! let (pipeline, mut executor) = RuntimeBuilder::new(WorldContext::from_shared(world.clone()))
//!     .with_config(RuntimeConfig::testing())
//!     .build();
//! let mut ticket = pipeline.submit(ToggleRequest::new(StructureId(1), ToggleCause::Redstone));
//!
//! executor.tick();
//! assert_eq!(ticket.try_result(), Some(ToggleResult::Success));
//! while !executor.is_idle() {
//!     executor.tick();
//! }
//!
//! let lift = world.structure(StructureId(1)).unwrap();
//! assert!(lift.is_open());
//! assert_eq!(lift.cuboid().min(), IVec3::new(0, 66, 0));
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod events;
pub mod executor;
pub mod pipeline;
pub mod registry;
pub mod request;

pub use builder::RuntimeBuilder;
pub use config::RuntimeConfig;
pub use error::{Result, ToggleError};
pub use events::{EventBus, EventVerdict, ToggleListener};
pub use executor::{AnimationId, TickExecutor, TickHandle};
pub use pipeline::{PreparedToggle, TogglePipeline};
pub use registry::{AdmissionSlot, AnimationRegistry};
pub use request::{ToggleAction, ToggleCause, ToggleRequest, ToggleResult, ToggleTicket};
