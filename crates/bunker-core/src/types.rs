use glam::IVec3;
use std::fmt;

/// Dense numeric block id, assigned by the registry at load time. 0 = air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);

    pub fn is_air(self) -> bool {
        self == Self::AIR
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// World coordinate in block space. X and Z are non-negative inside the world.
pub type WorldCoord = IVec3;

/// Identity of one chunk: chunk-space X/Z and the world Y of its slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub y: i32,
}

impl ChunkKey {
    pub const fn new(chunk_x: i32, chunk_z: i32, y: i32) -> Self {
        Self { chunk_x, chunk_z, y }
    }

    /// Same column, different slice.
    pub fn with_y(self, y: i32) -> Self {
        Self { y, ..self }
    }

    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            chunk_x: self.chunk_x + dx,
            chunk_z: self.chunk_z + dz,
            y: self.y,
        }
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk({}, {}) @ y={}", self.chunk_x, self.chunk_z, self.y)
    }
}
