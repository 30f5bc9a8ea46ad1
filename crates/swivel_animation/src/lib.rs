//! Swivel Animation
//!
//! Moves structures block by block, one world tick at a time.
//!
//! # Features
//!
//! - **Movement strategies**: one [`AnimationComponent`] per movement family
//!   (hinged rotation, vertical lift, horizontal slide, hinged tilt, sinusoidal
//!   wave, perpetual rotation), chosen from the structure's archetype
//! - **Animator**: owns the animated blocks of one animation and drives the
//!   `Pending -> Active -> Finishing -> Completed` lifecycle
//! - **Hooks**: ordered observers created per animation, isolated from each
//!   other's failures, with a built-in audio hook
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use swivel_animation::{
//!     animation_duration, create_component, plan_motion, Animation, AnimationConfig,
//!     AnimationHookManager, AnimationState, AnimationType, Animator,
//! };
//! use swivel_core::{
//!     Archetype, BlockDescriptor, Cuboid, HeadlessWorld, IVec3, MovementDirection, StructureId,
//!     StructureSnapshot, WorldContext,
//! };
//!
//! let world = Arc::new(HeadlessWorld::new());
//! let snapshot = StructureSnapshot::new(
//!     StructureId(1),
//!     "gate",
//!     Archetype::Portcullis { blocks_to_move: 3 },
//!     Cuboid::new(IVec3::new(0, 64, 0), IVec3::new(4, 64, 4)),
//!     IVec3::new(2, 64, 2),
//!     MovementDirection::Up,
//! );
//! world.insert_structure(snapshot.clone(), &BlockDescriptor::new("iron_bars"));
//!
//! let config = AnimationConfig::testing();
//! let plan = plan_motion(&snapshot).unwrap();
//! let duration = animation_duration(snapshot.archetype(), &plan, None, &config);
//! let component = create_component(&snapshot, &plan, duration, &config);
//! let animation = Animation::new(Arc::new(snapshot), plan.new_cuboid, duration, AnimationType::MoveBlocks);
//!
//! let mut animator = Animator::new(
//!     animation,
//!     component,
//!     &AnimationHookManager::new(),
//!     WorldContext::from_shared(world.clone()),
//!     &config,
//! );
//! animator.prepare_animation();
//! animator.start_animation(false).unwrap();
//! while !animator.tick().unwrap().is_terminal() {}
//!
//! assert_eq!(animator.state(), AnimationState::Completed);
//! assert!(world.block(IVec3::new(0, 67, 0)).is_some());
//! ```

pub mod animation;
pub mod animator;
pub mod archetype;
pub mod block;
pub mod component;
pub mod components;
pub mod config;
pub mod error;
pub mod hooks;

pub use animation::{Animation, AnimationState, AnimationType};
pub use animator::Animator;
pub use archetype::{
    animation_duration, create_component, plan_motion, resolve_direction, Motion, MotionPlan,
};
pub use block::AnimatedBlock;
pub use component::{AnimationComponent, MovementMethod};
pub use components::{
    HingedRotation, HingedTilt, HorizontalSlide, PerpetualRotation, SinusoidalWave, VerticalLift,
};
pub use config::{
    AnimationConfig, ArchetypeSettings, ArchetypeTable, AudioDescription, AudioSet, WaveFormula,
};
pub use error::{AnimationError, HookError, MotionError, Result};
pub use hooks::{
    AnimationHook, AnimationHookFactory, AnimationHookManager, AudioHook, AudioHookFactory,
    HookSet,
};
