//! Movement directions

use crate::math::Axis;
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Direction a structure moves towards when it opens
///
/// North is −Z, east is +X, up is +Y. Clockwise is seen from above.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementDirection {
    North,
    East,
    South,
    West,
    Up,
    Down,
    Clockwise,
    CounterClockwise,
    #[default]
    None,
}

impl MovementDirection {
    /// The direction that undoes this one
    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
            Self::None => Self::None,
        }
    }

    /// North, east, south or west
    pub fn is_cardinal(self) -> bool {
        matches!(self, Self::North | Self::East | Self::South | Self::West)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    pub fn is_rotational(self) -> bool {
        matches!(self, Self::Clockwise | Self::CounterClockwise)
    }

    /// Unit step for translating directions, zero otherwise
    pub fn offset(self) -> IVec3 {
        match self {
            Self::North => IVec3::NEG_Z,
            Self::East => IVec3::X,
            Self::South => IVec3::Z,
            Self::West => IVec3::NEG_X,
            Self::Up => IVec3::Y,
            Self::Down => IVec3::NEG_Y,
            Self::Clockwise | Self::CounterClockwise | Self::None => IVec3::ZERO,
        }
    }

    /// Axis a translation in this direction travels along
    pub fn travel_axis(self) -> Option<Axis> {
        match self {
            Self::North | Self::South => Some(Axis::Z),
            Self::East | Self::West => Some(Axis::X),
            Self::Up | Self::Down => Some(Axis::Y),
            Self::Clockwise | Self::CounterClockwise | Self::None => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
            Self::Clockwise => "clockwise",
            Self::CounterClockwise => "counter_clockwise",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for MovementDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
