//! Sinusoidal wave

use crate::animator::Animator;
use crate::component::{AnimationComponent, MovementMethod};
use crate::config::WaveFormula;
use swivel_core::{Cuboid, DVec3, IVec3};

/// Waves a flag's cloth sideways around its pole
///
/// Blocks are displaced along the horizontal axis perpendicular to the cloth,
/// more strongly the farther they are from the pole. A block on the pole never
/// moves. Each cycle ends with the cloth back in its original cells.
#[derive(Clone, Debug, PartialEq)]
pub struct SinusoidalWave {
    pole: IVec3,
    north_south_aligned: bool,
    length: f64,
    formula: WaveFormula,
}

impl SinusoidalWave {
    pub fn new(cuboid: &Cuboid, pole: IVec3, north_south_aligned: bool, formula: WaveFormula) -> Self {
        let length = cuboid
            .corners()
            .iter()
            .map(|corner| along_cloth(north_south_aligned, *corner - pole).abs())
            .fold(0.0, f64::max);
        Self {
            pole,
            north_south_aligned,
            length,
            formula,
        }
    }

    /// Distance from the pole to the farthest cloth block
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Direction blocks are displaced in
    pub fn wave_direction(&self) -> DVec3 {
        if self.north_south_aligned {
            DVec3::X
        } else {
            DVec3::Z
        }
    }

    /// Sideways displacement of a block at `radius` from the pole and `height`
    /// above the pole's base after `ticks` steps
    pub fn offset(&self, radius: f64, height: f64, ticks: u32) -> f64 {
        let f = &self.formula;
        let cap = (f.max_offset * radius.min(self.length)).abs();
        let phase = radius / f.wavelength + f64::from(ticks) / f.period + height * f.vertical_phase;
        (f.amplitude * radius * phase.sin()).max(-cap).min(cap)
    }

    pub fn goal_position(&self, start: DVec3, radius: f64, ticks: u32, ticks_remaining: u32) -> DVec3 {
        if ticks_remaining == 0 || radius == 0.0 {
            return start;
        }
        let height = start.y - f64::from(self.pole.y);
        start + self.wave_direction() * self.offset(radius, height, ticks)
    }
}

fn along_cloth(north_south_aligned: bool, rel: IVec3) -> f64 {
    if north_south_aligned {
        f64::from(rel.z)
    } else {
        f64::from(rel.x)
    }
}

impl AnimationComponent for SinusoidalWave {
    fn radius(&self, position: IVec3) -> f64 {
        along_cloth(self.north_south_aligned, position - self.pole).abs()
    }

    fn final_position(&self, start: DVec3, _radius: f64) -> DVec3 {
        start
    }

    fn execute_animation_step(&self, animator: &mut Animator, ticks: u32, ticks_remaining: u32) {
        animator.move_blocks(ticks_remaining, |block| {
            self.goal_position(block.start_position(), block.radius(), ticks, ticks_remaining)
        });
    }

    fn movement_method(&self) -> MovementMethod {
        MovementMethod::Teleport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag() -> SinusoidalWave {
        let cloth = Cuboid::new(IVec3::new(0, 70, 0), IVec3::new(6, 73, 0));
        SinusoidalWave::new(&cloth, IVec3::new(0, 70, 0), false, WaveFormula::default())
    }

    #[test]
    fn test_length_and_radius() {
        let flag = flag();
        assert_eq!(flag.length(), 6.0);
        assert_eq!(flag.radius(IVec3::new(4, 72, 0)), 4.0);
        assert_eq!(flag.wave_direction(), DVec3::Z);
    }

    #[test]
    fn test_pole_never_moves() {
        let flag = flag();
        let start = DVec3::new(0.5, 71.0, 0.5);
        for ticks in 1..50 {
            assert_eq!(flag.goal_position(start, 0.0, ticks, 50 - ticks), start);
        }
    }

    #[test]
    fn test_offset_is_capped() {
        let flag = flag();
        for ticks in 0..100 {
            for radius in 1..=6 {
                let radius = f64::from(radius);
                let offset = flag.offset(radius, 1.0, ticks);
                assert!(offset.abs() <= 0.4 * radius + 1e-12);
            }
        }
    }

    #[test]
    fn test_cycle_ends_at_start() {
        let flag = flag();
        let start = DVec3::new(5.5, 72.0, 0.5);
        assert_ne!(flag.goal_position(start, 5.0, 3, 7), start);
        assert_eq!(flag.goal_position(start, 5.0, 10, 0), start);
        assert_eq!(flag.final_position(start, 5.0), start);
    }
}
