//! Horizontal translation

use super::translation_at;
use crate::animator::Animator;
use crate::component::AnimationComponent;
use swivel_core::{DVec3, IVec3};

/// Moves every block along X or Z
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HorizontalSlide {
    offset: IVec3,
    duration: u32,
}

impl HorizontalSlide {
    /// Create a slide by `offset`; any vertical component is ignored
    pub fn new(offset: IVec3, duration: u32) -> Self {
        Self {
            offset: IVec3::new(offset.x, 0, offset.z),
            duration: duration.max(1),
        }
    }

    pub fn offset(&self) -> IVec3 {
        self.offset
    }

    pub fn goal_position(&self, start: DVec3, ticks: u32) -> DVec3 {
        start + translation_at(self.offset, ticks, self.duration)
    }
}

impl AnimationComponent for HorizontalSlide {
    fn radius(&self, _position: IVec3) -> f64 {
        0.0
    }

    fn final_position(&self, start: DVec3, _radius: f64) -> DVec3 {
        start + self.offset.as_dvec3()
    }

    fn execute_animation_step(&self, animator: &mut Animator, ticks: u32, ticks_remaining: u32) {
        animator.move_blocks(ticks_remaining, |block| {
            self.goal_position(block.start_position(), ticks)
        });
    }
}
