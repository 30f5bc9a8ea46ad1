//! Archetype dispatch
//!
//! Maps a structure's [`Archetype`] to the movement it performs: which
//! direction it moves in, the geometry it ends up with, how long the movement
//! takes and which [`AnimationComponent`] drives it.

use crate::component::AnimationComponent;
use crate::components::{
    HingedRotation, HingedTilt, HorizontalSlide, PerpetualRotation, SinusoidalWave, VerticalLift,
};
use crate::config::AnimationConfig;
use crate::error::MotionError;
use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;
use swivel_core::math::axis_radius;
use swivel_core::{Archetype, Axis, Cuboid, IVec3, MovementDirection, StructureSnapshot};

/// Shape of a planned movement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Quarter turns around an axis through the rotation point
    Rotate { axis: Axis, quarter_turns: i32 },
    /// Straight translation by whole blocks
    Translate { offset: IVec3 },
    /// Waving in place
    Wave { north_south_aligned: bool },
}

/// Everything decided about a toggle before it is admitted
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionPlan {
    pub direction: MovementDirection,
    pub motion: Motion,
    /// Geometry after the movement
    pub new_cuboid: Cuboid,
    /// Distance travelled by the farthest block, in blocks
    pub distance: f64,
    pub perpetual: bool,
}

impl MotionPlan {
    /// Whether the structure is open once the movement completes
    pub fn opens(&self, snapshot: &StructureSnapshot) -> bool {
        if self.perpetual {
            snapshot.is_open()
        } else {
            !snapshot.is_open()
        }
    }
}

/// The direction a toggle moves the structure in
///
/// Closing reverses the open direction. Perpetual archetypes always move in
/// their open direction.
pub fn resolve_direction(snapshot: &StructureSnapshot) -> MovementDirection {
    if snapshot.archetype().is_perpetual() || !snapshot.is_open() {
        snapshot.open_direction()
    } else {
        snapshot.open_direction().opposite()
    }
}

/// Plan the movement of a toggle
pub fn plan_motion(snapshot: &StructureSnapshot) -> Result<MotionPlan, MotionError> {
    let archetype = snapshot.archetype();
    let direction = resolve_direction(snapshot);
    let invalid = || MotionError::InvalidDirection {
        archetype: archetype.kind(),
        direction,
    };
    let out_of_range = || MotionError::OutOfRange {
        archetype: archetype.kind(),
        direction,
    };
    let cuboid = snapshot.cuboid();
    let pivot = snapshot.rotation_point();
    let dimensions = cuboid.dimensions();

    let motion = match archetype {
        Archetype::BigDoor => Motion::Rotate {
            axis: Axis::Y,
            quarter_turns: yaw_sign(direction).ok_or_else(invalid)?,
        },
        Archetype::RevolvingDoor { quarter_circles } => Motion::Rotate {
            axis: Axis::Y,
            quarter_turns: yaw_sign(direction).ok_or_else(invalid)? * quarters(quarter_circles),
        },
        Archetype::Portcullis { blocks_to_move } | Archetype::Elevator { blocks_to_move } => {
            if !direction.is_vertical() {
                return Err(invalid());
            }
            Motion::Translate {
                offset: direction.offset() * blocks_or(blocks_to_move, dimensions.y),
            }
        }
        Archetype::SlidingDoor { blocks_to_move } => {
            let extent = match direction.travel_axis() {
                Some(Axis::X) => dimensions.x,
                Some(Axis::Z) => dimensions.z,
                _ => return Err(invalid()),
            };
            Motion::Translate {
                offset: direction.offset() * blocks_or(blocks_to_move, extent),
            }
        }
        Archetype::Drawbridge => {
            let (axis, sign) = tilt(direction).ok_or_else(invalid)?;
            Motion::Rotate {
                axis,
                quarter_turns: sign,
            }
        }
        Archetype::Flag {
            north_south_aligned,
        } => Motion::Wave {
            north_south_aligned,
        },
        Archetype::Windmill { quarter_circles } => {
            let (axis, sign) = match yaw_sign(direction) {
                Some(sign) => (Axis::Y, sign),
                None => tilt(direction).ok_or_else(invalid)?,
            };
            Motion::Rotate {
                axis,
                quarter_turns: sign * quarters(quarter_circles),
            }
        }
    };

    let (new_cuboid, distance) = match motion {
        Motion::Rotate {
            axis,
            quarter_turns,
        } => {
            let farthest = cuboid
                .corners()
                .iter()
                .map(|corner| axis_radius(axis, *corner, pivot))
                .fold(0.0, f64::max);
            (
                cuboid
                    .checked_rotated(pivot, axis, quarter_turns)
                    .ok_or_else(out_of_range)?,
                farthest * f64::from(quarter_turns.abs()) * FRAC_PI_2,
            )
        }
        Motion::Translate { offset } => (
            cuboid.checked_translated(offset).ok_or_else(out_of_range)?,
            f64::from(offset.abs().max_element()),
        ),
        Motion::Wave { .. } => (cuboid, 0.0),
    };

    Ok(MotionPlan {
        direction,
        motion,
        new_cuboid,
        distance,
        perpetual: archetype.is_perpetual(),
    })
}

/// Number of ticks a movement lasts
///
/// Perpetual archetypes use their fixed cycle lengths. Everything else moves
/// at the archetype's configured speed, or over `requested_seconds` when
/// given, scaled by the time multiplier and stretched so the farthest block
/// never exceeds the maximum speed. No movement lasts longer than the
/// configured maximum duration.
pub fn animation_duration(
    archetype: Archetype,
    plan: &MotionPlan,
    requested_seconds: Option<f64>,
    config: &AnimationConfig,
) -> u32 {
    let longest = config.max_duration_ticks();
    match archetype {
        Archetype::Windmill { quarter_circles } => {
            let ticks = (quarters(quarter_circles) as u32)
                .saturating_mul(config.ticks_per_quarter_circle.max(1));
            return ticks.min(longest);
        }
        Archetype::Flag { .. } => return config.flag_cycle_ticks.clamp(1, longest),
        _ => {}
    }

    let settings = config.settings(archetype.kind());
    let base = match requested_seconds {
        Some(seconds) if seconds.is_finite() && seconds > 0.0 => seconds,
        _ if settings.speed > 0.0 => plan.distance / settings.speed,
        _ => 0.0,
    };
    let mut seconds = base * settings.time_multiplier;
    if settings.max_speed > 0.0 {
        seconds = seconds.max(plan.distance / settings.max_speed);
    }
    // Float to int casts saturate, NaN lands on 0
    let ticks = (seconds * f64::from(config.tick_rate)).round();
    (ticks as u32).clamp(1, longest)
}

/// Create the movement strategy for a planned toggle
pub fn create_component(
    snapshot: &StructureSnapshot,
    plan: &MotionPlan,
    duration: u32,
    config: &AnimationConfig,
) -> Arc<dyn AnimationComponent> {
    let pivot = snapshot.rotation_point();
    match (snapshot.archetype(), plan.motion) {
        (Archetype::Windmill { .. }, Motion::Rotate { axis, quarter_turns }) => {
            Arc::new(PerpetualRotation::new(pivot, axis, quarter_turns, duration))
        }
        (_, Motion::Rotate { axis: Axis::Y, quarter_turns }) => {
            Arc::new(HingedRotation::new(pivot, quarter_turns, duration))
        }
        (_, Motion::Rotate { axis, quarter_turns }) => {
            Arc::new(HingedTilt::new(pivot, axis, quarter_turns, duration))
        }
        (_, Motion::Translate { offset }) if offset.y != 0 => {
            Arc::new(VerticalLift::new(offset.y, duration))
        }
        (_, Motion::Translate { offset }) => Arc::new(HorizontalSlide::new(offset, duration)),
        (_, Motion::Wave { north_south_aligned }) => Arc::new(SinusoidalWave::new(
            &snapshot.cuboid(),
            pivot,
            north_south_aligned,
            config.wave.clone(),
        )),
    }
}

fn yaw_sign(direction: MovementDirection) -> Option<i32> {
    match direction {
        MovementDirection::Clockwise => Some(1),
        MovementDirection::CounterClockwise => Some(-1),
        _ => None,
    }
}

/// Axis and direction of a tilt towards a cardinal direction
fn tilt(direction: MovementDirection) -> Option<(Axis, i32)> {
    match direction {
        MovementDirection::North => Some((Axis::X, -1)),
        MovementDirection::South => Some((Axis::X, 1)),
        MovementDirection::East => Some((Axis::Z, -1)),
        MovementDirection::West => Some((Axis::Z, 1)),
        _ => None,
    }
}

fn quarters(quarter_circles: u32) -> i32 {
    quarter_circles.clamp(1, 64) as i32
}

fn blocks_or(blocks_to_move: u32, fallback: i32) -> i32 {
    if blocks_to_move == 0 {
        fallback
    } else {
        blocks_to_move.min(i32::MAX as u32) as i32
    }
}
