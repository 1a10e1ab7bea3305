//! Chunk mesh synthesis: one textured quad per visible block face.

pub mod buffers;
pub mod faces;
pub mod mesher;
pub mod uv_table;

pub use buffers::{Aabb, MeshBuffers};
pub use mesher::ChunkMesher;
pub use uv_table::BlockUvTable;
