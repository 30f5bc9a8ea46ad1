//! Rotation math for animated blocks
//!
//! All rotations follow the same right-handed convention so that the float
//! rotations used while animating and the exact integer quarter turns used to
//! compute new structure coordinates always agree:
//!
//! - [`Axis::Y`] (yaw): `(dx, dz) -> (dx·cos − dz·sin, dx·sin + dz·cos)`
//! - [`Axis::X`] (pitch): `(dy, dz) -> (dy·cos − dz·sin, dy·sin + dz·cos)`
//! - [`Axis::Z`] (roll): `(dx, dy) -> (dx·cos − dy·sin, dx·sin + dy·cos)`
//!
//! With a y-up world where north is −Z and east is +X, a positive yaw of
//! `π/2` turns north into east, i.e. clockwise when seen from above.

use glam::{DVec3, I64Vec3, IVec3};
use serde::{Deserialize, Serialize};

/// Maximum distance between the last animation step and the final position
pub const FINAL_POSITION_TOLERANCE: f64 = 1e-6;

/// Offset from a block's integer corner to the point where its proxy lives
pub const BLOCK_CENTER_OFFSET: DVec3 = DVec3::new(0.5, 0.0, 0.5);

/// Rotation axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Visual orientation applied to a block proxy, in radians
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Rotation {
    /// Rotation of `angle` radians around a single axis
    pub fn around(axis: Axis, angle: f64) -> Self {
        match axis {
            Axis::X => Self {
                pitch: angle,
                ..Self::default()
            },
            Axis::Y => Self {
                yaw: angle,
                ..Self::default()
            },
            Axis::Z => Self {
                roll: angle,
                ..Self::default()
            },
        }
    }
}

/// The point a block proxy occupies for a block at an integer position
pub fn block_center(position: IVec3) -> DVec3 {
    position.as_dvec3() + BLOCK_CENTER_OFFSET
}

/// The integer cell a proxy at `position` settles into
pub fn resting_cell(position: DVec3) -> IVec3 {
    (position - BLOCK_CENTER_OFFSET).round().as_ivec3()
}

/// Rotate `point` around the vertical axis through `center`
pub fn rotate_yaw(point: DVec3, center: DVec3, angle: f64) -> DVec3 {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dz = point.z - center.z;
    DVec3::new(
        center.x + dx * cos - dz * sin,
        point.y,
        center.z + dx * sin + dz * cos,
    )
}

/// Rotate `point` around the east-west axis through `center`
pub fn rotate_pitch(point: DVec3, center: DVec3, angle: f64) -> DVec3 {
    let (sin, cos) = angle.sin_cos();
    let dy = point.y - center.y;
    let dz = point.z - center.z;
    DVec3::new(
        point.x,
        center.y + dy * cos - dz * sin,
        center.z + dy * sin + dz * cos,
    )
}

/// Rotate `point` around the north-south axis through `center`
pub fn rotate_roll(point: DVec3, center: DVec3, angle: f64) -> DVec3 {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    DVec3::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
        point.z,
    )
}

/// Rotate `point` around `axis` through `center`
pub fn rotate_around(axis: Axis, point: DVec3, center: DVec3, angle: f64) -> DVec3 {
    match axis {
        Axis::X => rotate_pitch(point, center, angle),
        Axis::Y => rotate_yaw(point, center, angle),
        Axis::Z => rotate_roll(point, center, angle),
    }
}

/// Exact integer rotation of a block position by a number of quarter turns
///
/// Matches [`rotate_around`] with `quarter_turns · π/2` for block centers
/// rotated around the center of the `pivot` block. Returns `None` when the
/// rotated position does not fit in block coordinates.
pub fn checked_rotate_quarter_turns(
    position: IVec3,
    pivot: IVec3,
    axis: Axis,
    quarter_turns: i32,
) -> Option<IVec3> {
    let pivot = pivot.as_i64vec3();
    let mut rel = position.as_i64vec3() - pivot;
    for _ in 0..quarter_turns.rem_euclid(4) {
        rel = match axis {
            Axis::X => I64Vec3::new(rel.x, -rel.z, rel.y),
            Axis::Y => I64Vec3::new(-rel.z, rel.y, rel.x),
            Axis::Z => I64Vec3::new(-rel.y, rel.x, rel.z),
        };
    }
    narrow(pivot + rel)
}

/// Convert a wide position back to block coordinates, if it fits
pub(crate) fn narrow(position: I64Vec3) -> Option<IVec3> {
    Some(IVec3::new(
        i32::try_from(position.x).ok()?,
        i32::try_from(position.y).ok()?,
        i32::try_from(position.z).ok()?,
    ))
}

/// Distance from `position` to the rotation axis through `pivot`
pub fn axis_radius(axis: Axis, position: IVec3, pivot: IVec3) -> f64 {
    let (a, b) = plane_offsets(axis, position, pivot);
    a.hypot(b)
}

/// Angle of `position` around the rotation axis through `pivot`
pub fn axis_angle(axis: Axis, position: IVec3, pivot: IVec3) -> f64 {
    let (a, b) = plane_offsets(axis, position, pivot);
    b.atan2(a)
}

fn plane_offsets(axis: Axis, position: IVec3, pivot: IVec3) -> (f64, f64) {
    let rel = position.as_dvec3() - pivot.as_dvec3();
    match axis {
        Axis::X => (rel.y, rel.z),
        Axis::Y => (rel.x, rel.z),
        Axis::Z => (rel.x, rel.y),
    }
}
