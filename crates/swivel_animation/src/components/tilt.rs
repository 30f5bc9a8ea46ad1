//! Hinged tilt around a horizontal axis

use super::Spin;
use crate::animator::Animator;
use crate::component::AnimationComponent;
use swivel_core::{Axis, DVec3, IVec3, Rotation};

/// Tilts every block around a horizontal hinge
///
/// Proxies are respawned once, halfway through, so hosts that lose track of
/// entities rotated far from their spawn orientation pick them up again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HingedTilt {
    spin: Spin,
}

impl HingedTilt {
    /// Create a tilt around `axis` (X or Z) through the hinge
    pub fn new(hinge: IVec3, axis: Axis, quarter_turns: i32, duration: u32) -> Self {
        Self {
            spin: Spin::new(axis, hinge, quarter_turns, duration),
        }
    }

    pub fn axis(&self) -> Axis {
        self.spin.axis()
    }

    /// The tick at which every proxy is respawned
    pub fn respawn_tick(&self) -> u32 {
        self.spin.duration() / 2
    }

    pub fn goal_position(&self, start: DVec3, ticks: u32) -> DVec3 {
        self.spin.position_at(start, ticks)
    }
}

impl AnimationComponent for HingedTilt {
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
        if ticks == self.respawn_tick() && ticks_remaining > 0 {
            animator.respawn_blocks();
        }
        self.spin.step(animator, ticks, ticks_remaining);
    }
}
