//! Axis-aligned integer boxes

use crate::math::{checked_rotate_quarter_turns, narrow, Axis};
use glam::{DVec3, I64Vec3, IVec2, IVec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned box of block positions, inclusive on both corners
///
/// `min <= max` holds componentwise for every value of this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawCuboid", into = "RawCuboid")]
pub struct Cuboid {
    min: IVec3,
    max: IVec3,
}

#[derive(Serialize, Deserialize)]
struct RawCuboid {
    min: IVec3,
    max: IVec3,
}

impl From<RawCuboid> for Cuboid {
    fn from(raw: RawCuboid) -> Self {
        Cuboid::new(raw.min, raw.max)
    }
}

impl From<Cuboid> for RawCuboid {
    fn from(cuboid: Cuboid) -> Self {
        RawCuboid {
            min: cuboid.min,
            max: cuboid.max,
        }
    }
}

impl Cuboid {
    /// Create a cuboid spanning two opposite corners, in any order
    pub fn new(a: IVec3, b: IVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A cuboid containing exactly one block
    pub fn single(position: IVec3) -> Self {
        Self {
            min: position,
            max: position,
        }
    }

    /// Smallest cuboid containing all `points`, or `None` when there are none
    pub fn bounding<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = IVec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::single(first), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    pub fn min(&self) -> IVec3 {
        self.min
    }

    pub fn max(&self) -> IVec3 {
        self.max
    }

    /// Number of blocks along each axis, saturating at `i32::MAX`
    pub fn dimensions(&self) -> IVec3 {
        self.wide_dimensions()
            .min(I64Vec3::splat(i64::from(i32::MAX)))
            .as_ivec3()
    }

    /// Number of blocks contained, saturating at `u64::MAX`
    pub fn volume(&self) -> u64 {
        let dims = self.wide_dimensions();
        (dims.x as u64)
            .saturating_mul(dims.y as u64)
            .saturating_mul(dims.z as u64)
    }

    fn wide_dimensions(&self) -> I64Vec3 {
        self.max.as_i64vec3() - self.min.as_i64vec3() + I64Vec3::ONE
    }

    /// Geometric midpoint between the two corners
    pub fn center(&self) -> DVec3 {
        (self.min.as_dvec3() + self.max.as_dvec3()) / 2.0
    }

    /// The block closest to the center, rounding towards `min`
    pub fn center_block(&self) -> IVec3 {
        ((self.min.as_i64vec3() + self.max.as_i64vec3()).div_euclid(I64Vec3::splat(2))).as_ivec3()
    }

    /// The 8 corner positions
    pub fn corners(&self) -> [IVec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            IVec3::new(min.x, min.y, min.z),
            IVec3::new(max.x, min.y, min.z),
            IVec3::new(min.x, max.y, min.z),
            IVec3::new(max.x, max.y, min.z),
            IVec3::new(min.x, min.y, max.z),
            IVec3::new(max.x, min.y, max.z),
            IVec3::new(min.x, max.y, max.z),
            IVec3::new(max.x, max.y, max.z),
        ]
    }

    /// The cuboid flattened onto the horizontal plane
    pub fn footprint(&self) -> Footprint {
        Footprint {
            min: IVec2::new(self.min.x, self.min.z),
            max: IVec2::new(self.max.x, self.max.z),
        }
    }

    pub fn contains(&self, position: IVec3) -> bool {
        position.cmpge(self.min).all() && position.cmple(self.max).all()
    }

    pub fn intersects(&self, other: &Cuboid) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Smallest cuboid containing both
    pub fn union(&self, other: &Cuboid) -> Cuboid {
        Cuboid {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Move the cuboid by `offset`
    ///
    /// Returns `None` when a corner would leave block coordinates.
    pub fn checked_translated(&self, offset: IVec3) -> Option<Cuboid> {
        let offset = offset.as_i64vec3();
        Some(Cuboid {
            min: narrow(self.min.as_i64vec3() + offset)?,
            max: narrow(self.max.as_i64vec3() + offset)?,
        })
    }

    /// Rotate by a number of quarter turns around `axis` through the `pivot` block
    ///
    /// Returns `None` when a corner would leave block coordinates.
    pub fn checked_rotated(&self, pivot: IVec3, axis: Axis, quarter_turns: i32) -> Option<Cuboid> {
        Some(Cuboid::new(
            checked_rotate_quarter_turns(self.min, pivot, axis, quarter_turns)?,
            checked_rotate_quarter_turns(self.max, pivot, axis, quarter_turns)?,
        ))
    }

    /// Restrict the cuboid to the vertical range `[min_y, max_y]`
    ///
    /// Returns `None` when nothing is left.
    pub fn clamp_y(&self, min_y: i32, max_y: i32) -> Option<Cuboid> {
        let low = self.min.y.max(min_y);
        let high = self.max.y.min(max_y);
        (low <= high).then(|| Cuboid {
            min: IVec3::new(self.min.x, low, self.min.z),
            max: IVec3::new(self.max.x, high, self.max.z),
        })
    }

    /// Every contained block position, x fastest, then z, then y
    pub fn positions(&self) -> impl Iterator<Item = IVec3> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| IVec3::new(x, y, z)))
        })
    }
}

impl std::fmt::Display for Cuboid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}, {}; {}, {}, {}]",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

/// A cuboid flattened onto the x/z plane
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Footprint {
    pub min: IVec2,
    pub max: IVec2,
}

impl Footprint {
    /// Extent along x
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    /// Extent along z
    pub fn depth(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.depth() as u64
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.y && z <= self.max.y
    }
}
