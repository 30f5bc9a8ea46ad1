//! Vertical translation

use super::translation_at;
use crate::animator::Animator;
use crate::component::AnimationComponent;
use swivel_core::{DVec3, IVec3};

/// Moves every block straight up or down
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerticalLift {
    /// Signed number of blocks, positive is up
    blocks: i32,
    duration: u32,
}

impl VerticalLift {
    pub fn new(blocks: i32, duration: u32) -> Self {
        Self {
            blocks,
            duration: duration.max(1),
        }
    }

    pub fn blocks(&self) -> i32 {
        self.blocks
    }

    /// Blocks travelled per tick
    pub fn step(&self) -> f64 {
        f64::from(self.blocks) / f64::from(self.duration)
    }

    /// Goal of a block starting at `start` after `ticks` steps
    pub fn goal_position(&self, start: DVec3, ticks: u32) -> DVec3 {
        start + translation_at(IVec3::Y * self.blocks, ticks, self.duration)
    }
}

impl AnimationComponent for VerticalLift {
    fn radius(&self, _position: IVec3) -> f64 {
        0.0
    }

    fn final_position(&self, start: DVec3, _radius: f64) -> DVec3 {
        start + DVec3::Y * f64::from(self.blocks)
    }

    fn execute_animation_step(&self, animator: &mut Animator, ticks: u32, ticks_remaining: u32) {
        animator.move_blocks(ticks_remaining, |block| {
            self.goal_position(block.start_position(), ticks)
        });
    }
}
