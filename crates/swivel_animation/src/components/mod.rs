//! Built-in movement strategies
//!
//! One strategy per movement family:
//!
//! - [`HingedRotation`]: doors swinging around a vertical hinge
//! - [`VerticalLift`]: portcullises and elevators
//! - [`HorizontalSlide`]: sliding doors
//! - [`HingedTilt`]: drawbridges
//! - [`SinusoidalWave`]: flags
//! - [`PerpetualRotation`]: windmills

mod hinged;
mod lift;
mod perpetual;
mod slide;
mod tilt;
mod wave;

pub use hinged::HingedRotation;
pub use lift::VerticalLift;
pub use perpetual::PerpetualRotation;
pub use slide::HorizontalSlide;
pub use tilt::HingedTilt;
pub use wave::SinusoidalWave;

use crate::animator::Animator;
use std::f64::consts::FRAC_PI_2;
use swivel_core::math::{axis_angle, axis_radius, block_center, rotate_around};
use swivel_core::{Axis, DVec3, IVec3, Rotation};

/// Rotation by whole quarter turns, spread evenly over a duration
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Spin {
    axis: Axis,
    pivot: IVec3,
    center: DVec3,
    angle: f64,
    duration: u32,
}

impl Spin {
    pub(crate) fn new(axis: Axis, pivot: IVec3, quarter_turns: i32, duration: u32) -> Self {
        Self {
            axis,
            pivot,
            center: block_center(pivot),
            angle: f64::from(quarter_turns) * FRAC_PI_2,
            duration: duration.max(1),
        }
    }

    pub(crate) fn axis(&self) -> Axis {
        self.axis
    }

    /// Total angle in radians
    pub(crate) fn angle(&self) -> f64 {
        self.angle
    }

    pub(crate) fn duration(&self) -> u32 {
        self.duration
    }

    pub(crate) fn angle_at(&self, ticks: u32) -> f64 {
        if ticks >= self.duration {
            self.angle
        } else {
            self.angle * f64::from(ticks) / f64::from(self.duration)
        }
    }

    pub(crate) fn position_at(&self, start: DVec3, ticks: u32) -> DVec3 {
        rotate_around(self.axis, start, self.center, self.angle_at(ticks))
    }

    pub(crate) fn radius(&self, position: IVec3) -> f64 {
        axis_radius(self.axis, position, self.pivot)
    }

    pub(crate) fn start_angle(&self, position: IVec3) -> f64 {
        axis_angle(self.axis, position, self.pivot)
    }

    pub(crate) fn final_position(&self, start: DVec3) -> DVec3 {
        rotate_around(self.axis, start, self.center, self.angle)
    }

    pub(crate) fn final_rotation(&self) -> Rotation {
        Rotation::around(self.axis, self.angle)
    }

    pub(crate) fn step(&self, animator: &mut Animator, ticks: u32, ticks_remaining: u32) {
        animator.set_rotation(Rotation::around(self.axis, self.angle_at(ticks)));
        animator.move_blocks(ticks_remaining, |block| {
            self.position_at(block.start_position(), ticks)
        });
    }
}

/// Offset of a translation after `ticks` of `duration` steps
///
/// Exact at both ends: zero at tick 0 and `total` at the last tick.
pub(crate) fn translation_at(total: IVec3, ticks: u32, duration: u32) -> DVec3 {
    let duration = duration.max(1);
    if ticks >= duration {
        return total.as_dvec3();
    }
    total.as_dvec3() * f64::from(ticks) / f64::from(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_angle_is_linear() {
        let spin = Spin::new(Axis::Y, IVec3::ZERO, 1, 10);
        assert_eq!(spin.angle_at(0), 0.0);
        assert!((spin.angle_at(5) - FRAC_PI_2 / 2.0).abs() < 1e-12);
        assert_eq!(spin.angle_at(10), FRAC_PI_2);
        assert_eq!(spin.angle_at(20), FRAC_PI_2);
    }

    #[test]
    fn test_translation_endpoints_are_exact() {
        let total = IVec3::new(0, 3, 0);
        assert_eq!(translation_at(total, 0, 40), DVec3::ZERO);
        assert_eq!(translation_at(total, 20, 40), DVec3::new(0.0, 1.5, 0.0));
        assert_eq!(translation_at(total, 40, 40), DVec3::new(0.0, 3.0, 0.0));
    }
}
