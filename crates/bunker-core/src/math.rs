use crate::constants::{CHUNK_EDGE, CHUNK_SIZE};
use crate::types::{ChunkKey, WorldCoord};

/// Chunk-space coordinate along X or Z for a block coordinate.
pub fn block_to_chunk(v: i32) -> i32 {
    v.div_euclid(CHUNK_SIZE as i32)
}

/// Chunk-local coordinate along X or Z, always in [0, CHUNK_SIZE).
pub fn block_to_local(v: i32) -> i32 {
    v.rem_euclid(CHUNK_SIZE as i32)
}

/// Key of the chunk containing a world position.
pub fn chunk_key_of(pos: WorldCoord) -> ChunkKey {
    ChunkKey::new(block_to_chunk(pos.x), block_to_chunk(pos.z), pos.y)
}

/// Flat index into a chunk's block array. Row-major on X.
pub fn local_index(local_x: i32, local_z: i32) -> usize {
    (local_x * CHUNK_SIZE as i32 + local_z) as usize
}

/// Inverse of [`local_index`].
pub fn index_to_local(index: usize) -> (i32, i32) {
    let cs = CHUNK_SIZE as usize;
    ((index / cs) as i32, (index % cs) as i32)
}

/// World X/Z of a chunk's local (0, 0) corner.
pub fn chunk_origin(chunk_x: i32, chunk_z: i32) -> (i32, i32) {
    let cs = CHUNK_SIZE as i32;
    (chunk_x * cs, chunk_z * cs)
}

/// Number of chunks needed to cover `extent` blocks.
pub fn chunks_to_cover(extent: u32) -> u32 {
    extent.div_ceil(CHUNK_SIZE)
}

/// -1 when the local coordinate sits on the low edge, +1 on the high edge, 0 otherwise.
pub fn edge_side(local: i32) -> i32 {
    if local == 0 {
        -1
    } else if local == CHUNK_EDGE {
        1
    } else {
        0
    }
}
