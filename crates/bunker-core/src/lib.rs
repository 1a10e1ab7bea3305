//! Shared vocabulary for the bunker voxel world: constants, ids, chunk
//! coordinate math, face directions and the data records loaded from disk.

pub mod block;
pub mod constants;
pub mod face;
pub mod math;
pub mod mod_manifest;
pub mod ore;
pub mod types;

pub use block::{BlockDefinition, DropEntry, TextureSet, TextureSlot};
pub use face::{Face, ALL_FACES};
pub use ore::OreConfig;
pub use types::{BlockId, ChunkKey, WorldCoord};
