//! Perpetual rotation

use super::Spin;
use crate::animator::Animator;
use crate::component::AnimationComponent;
use swivel_core::{Axis, DVec3, IVec3, Rotation};

/// Turns every block around a fixed axis, one cycle at a time
///
/// Each cycle has a fixed duration; the runtime starts the next one as soon as
/// the previous completes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerpetualRotation {
    spin: Spin,
}

impl PerpetualRotation {
    pub fn new(center: IVec3, axis: Axis, quarter_turns: i32, duration: u32) -> Self {
        Self {
            spin: Spin::new(axis, center, quarter_turns, duration),
        }
    }

    pub fn axis(&self) -> Axis {
        self.spin.axis()
    }

    pub fn goal_position(&self, start: DVec3, ticks: u32) -> DVec3 {
        self.spin.position_at(start, ticks)
    }
}

impl AnimationComponent for PerpetualRotation {
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

#[cfg(test)]
mod tests {
    use super::*;
    use swivel_core::math::block_center;

    #[test]
    fn test_full_cycle_returns_home() {
        let rotor = PerpetualRotation::new(IVec3::new(0, 80, 0), Axis::X, 4, 20);
        let blade = block_center(IVec3::new(0, 83, 0));
        assert!(rotor.final_position(blade, 3.0).abs_diff_eq(blade, 1e-9));

        let halfway = rotor.goal_position(blade, 10);
        assert!(halfway.abs_diff_eq(block_center(IVec3::new(0, 77, 0)), 1e-9));
    }
}
