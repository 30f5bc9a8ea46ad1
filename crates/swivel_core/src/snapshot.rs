//! Structure snapshots
//!
//! A [`StructureSnapshot`] is captured once per toggle and never mutated. The
//! animation component and every hook read from it; geometry changes produce a
//! new snapshot through [`StructureSnapshot::with_geometry`].

use crate::cuboid::Cuboid;
use crate::direction::MovementDirection;
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Unique identifier of a structure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureId(pub u64);

impl std::fmt::Display for StructureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Movement family of a structure, with its per-type parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Archetype {
    /// Door swinging a quarter circle around a vertical hinge
    BigDoor,
    /// Door rotating several quarter circles around a vertical axis
    RevolvingDoor {
        #[serde(default = "default_quarter_circles")]
        quarter_circles: u32,
    },
    /// Gate lifting or lowering along Y
    Portcullis {
        /// Blocks to travel, 0 means the structure's height
        #[serde(default)]
        blocks_to_move: u32,
    },
    /// Platform lifting or lowering along Y
    Elevator {
        #[serde(default)]
        blocks_to_move: u32,
    },
    /// Panel sliding horizontally
    SlidingDoor {
        /// Blocks to travel, 0 means the structure's extent along the travel axis
        #[serde(default)]
        blocks_to_move: u32,
    },
    /// Bridge tilting a quarter circle around a horizontal hinge
    Drawbridge,
    /// Banner waving around its pole
    Flag {
        /// Whether the cloth extends along Z (and waves along X)
        #[serde(default)]
        north_south_aligned: bool,
    },
    /// Rotor turning continuously
    Windmill {
        #[serde(default = "default_quarter_circles")]
        quarter_circles: u32,
    },
}

fn default_quarter_circles() -> u32 {
    4
}

impl Archetype {
    pub fn kind(&self) -> ArchetypeKind {
        match self {
            Archetype::BigDoor => ArchetypeKind::BigDoor,
            Archetype::RevolvingDoor { .. } => ArchetypeKind::RevolvingDoor,
            Archetype::Portcullis { .. } => ArchetypeKind::Portcullis,
            Archetype::Elevator { .. } => ArchetypeKind::Elevator,
            Archetype::SlidingDoor { .. } => ArchetypeKind::SlidingDoor,
            Archetype::Drawbridge => ArchetypeKind::Drawbridge,
            Archetype::Flag { .. } => ArchetypeKind::Flag,
            Archetype::Windmill { .. } => ArchetypeKind::Windmill,
        }
    }

    /// Perpetual archetypes never close; every cycle re-issues the next one
    pub fn is_perpetual(&self) -> bool {
        self.kind().is_perpetual()
    }
}

/// Archetype tag without parameters, used as a configuration key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeKind {
    BigDoor,
    RevolvingDoor,
    Portcullis,
    Elevator,
    SlidingDoor,
    Drawbridge,
    Flag,
    Windmill,
}

impl ArchetypeKind {
    pub const ALL: [ArchetypeKind; 8] = [
        ArchetypeKind::BigDoor,
        ArchetypeKind::RevolvingDoor,
        ArchetypeKind::Portcullis,
        ArchetypeKind::Elevator,
        ArchetypeKind::SlidingDoor,
        ArchetypeKind::Drawbridge,
        ArchetypeKind::Flag,
        ArchetypeKind::Windmill,
    ];

    pub fn is_perpetual(self) -> bool {
        matches!(self, ArchetypeKind::Flag | ArchetypeKind::Windmill)
    }

    pub fn name(self) -> &'static str {
        match self {
            ArchetypeKind::BigDoor => "big_door",
            ArchetypeKind::RevolvingDoor => "revolving_door",
            ArchetypeKind::Portcullis => "portcullis",
            ArchetypeKind::Elevator => "elevator",
            ArchetypeKind::SlidingDoor => "sliding_door",
            ArchetypeKind::Drawbridge => "drawbridge",
            ArchetypeKind::Flag => "flag",
            ArchetypeKind::Windmill => "windmill",
        }
    }
}

impl std::fmt::Display for ArchetypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable capture of a structure's geometry and state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureSnapshot {
    id: StructureId,
    #[serde(default)]
    name: String,
    archetype: Archetype,
    cuboid: Cuboid,
    rotation_point: IVec3,
    #[serde(default)]
    open_direction: MovementDirection,
    #[serde(default)]
    is_open: bool,
    #[serde(default)]
    is_locked: bool,
}

impl StructureSnapshot {
    /// Create a closed, unlocked snapshot
    pub fn new(
        id: StructureId,
        name: impl Into<String>,
        archetype: Archetype,
        cuboid: Cuboid,
        rotation_point: IVec3,
        open_direction: MovementDirection,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            archetype,
            cuboid,
            rotation_point,
            open_direction,
            is_open: false,
            is_locked: false,
        }
    }

    /// Set the open flag
    pub fn with_open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }

    /// Set the locked flag
    pub fn with_locked(mut self, is_locked: bool) -> Self {
        self.is_locked = is_locked;
        self
    }

    /// A new snapshot of the same structure after a committed toggle
    pub fn with_geometry(&self, cuboid: Cuboid, is_open: bool) -> Self {
        Self {
            cuboid,
            is_open,
            ..self.clone()
        }
    }

    pub fn id(&self) -> StructureId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn cuboid(&self) -> Cuboid {
        self.cuboid
    }

    /// Hinge or pole position; need not lie inside the cuboid
    pub fn rotation_point(&self) -> IVec3 {
        self.rotation_point
    }

    pub fn open_direction(&self) -> MovementDirection {
        self.open_direction
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }
}
