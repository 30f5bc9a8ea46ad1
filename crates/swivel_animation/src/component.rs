//! Movement strategy interface

use crate::animator::Animator;
use swivel_core::{DVec3, IVec3, Rotation};

/// How proxies travel between two steps
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MovementMethod {
    /// Jump straight to the target
    Teleport,
    /// Travel towards the target over the tick
    #[default]
    Velocity,
}

/// Per-archetype movement strategy
///
/// A component is bound to one structure when it is created and never touches
/// the world itself: it computes goals and hands them to the [`Animator`].
/// Every method is deterministic in its inputs.
pub trait AnimationComponent: Send + Sync {
    /// Distance of the block at `position` from the movement's reference axis
    fn radius(&self, position: IVec3) -> f64;

    /// Angle of the block at `position` around the rotation axis
    fn start_angle(&self, _position: IVec3) -> f64 {
        0.0
    }

    /// Where a block starting at `start` comes to rest
    ///
    /// Must agree with the goal of the last step within
    /// [`FINAL_POSITION_TOLERANCE`](swivel_core::FINAL_POSITION_TOLERANCE).
    fn final_position(&self, start: DVec3, radius: f64) -> DVec3;

    /// Orientation of the structure once the movement completes
    fn final_rotation(&self) -> Rotation {
        Rotation::default()
    }

    /// Compute this step's goal for every block and apply it through `animator`
    ///
    /// `ticks` counts the steps executed so far, including this one.
    fn execute_animation_step(&self, animator: &mut Animator, ticks: u32, ticks_remaining: u32);

    fn movement_method(&self) -> MovementMethod {
        MovementMethod::Velocity
    }
}
