use glam::{IVec3, Vec3};

use crate::block::TextureSlot;

/// One of the six axis-aligned faces of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    Up = 0,
    Down = 1,
    /// +Z
    North = 2,
    /// -Z
    South = 3,
    /// +X
    East = 4,
    /// -X
    West = 5,
}

/// All six faces in emission order.
pub const ALL_FACES: [Face; 6] = [
    Face::Up,
    Face::Down,
    Face::North,
    Face::South,
    Face::East,
    Face::West,
];

impl Face {
    /// Offset to the neighbouring block across this face. Y-up.
    pub fn offset(self) -> IVec3 {
        match self {
            Face::Up => IVec3::new(0, 1, 0),
            Face::Down => IVec3::new(0, -1, 0),
            Face::North => IVec3::new(0, 0, 1),
            Face::South => IVec3::new(0, 0, -1),
            Face::East => IVec3::new(1, 0, 0),
            Face::West => IVec3::new(-1, 0, 0),
        }
    }

    /// Outward unit normal.
    pub fn normal(self) -> Vec3 {
        self.offset().as_vec3()
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::Up => Face::Down,
            Face::Down => Face::Up,
            Face::North => Face::South,
            Face::South => Face::North,
            Face::East => Face::West,
            Face::West => Face::East,
        }
    }

    /// Which texture of a block's set is drawn on this face.
    pub fn texture_slot(self) -> TextureSlot {
        match self {
            Face::Up => TextureSlot::Top,
            Face::Down => TextureSlot::Bottom,
            _ => TextureSlot::Side,
        }
    }

    pub fn is_horizontal(self) -> bool {
        !matches!(self, Face::Up | Face::Down)
    }
}
