//! Hinged rotation around a vertical axis

use super::Spin;
use crate::animator::Animator;
use crate::component::AnimationComponent;
use swivel_core::{Axis, DVec3, IVec3, Rotation};

/// Swings every block around the vertical axis through the hinge
///
/// Positive quarter turns are clockwise when seen from above.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HingedRotation {
    spin: Spin,
}

impl HingedRotation {
    pub fn new(hinge: IVec3, quarter_turns: i32, duration: u32) -> Self {
        Self {
            spin: Spin::new(Axis::Y, hinge, quarter_turns, duration),
        }
    }

    /// Total angle in radians
    pub fn angle(&self) -> f64 {
        self.spin.angle()
    }

    /// Goal of a block starting at `start` after `ticks` steps
    pub fn goal_position(&self, start: DVec3, ticks: u32) -> DVec3 {
        self.spin.position_at(start, ticks)
    }
}

impl AnimationComponent for HingedRotation {
    fn radius(&self, position: IVec3) -> f64 {
        self.spin.radius(position)
    }

    fn start_angle(&self, position: IVec3) -> f64 {
        self.spin.start_angle(position)
    }

    fn final_position(&self, start: DVec3, _radius: f64) -> DVec3 {
        self.spin.final_position(start)
    }

    fn final_rotation(&self) -> Rotation {
        self.spin.final_rotation()
    }

    fn execute_animation_step(&self, animator: &mut Animator, ticks: u32, ticks_remaining: u32) {
        self.spin.step(animator, ticks, ticks_remaining);
    }
}
