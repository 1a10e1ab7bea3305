//! Shared constants for storage, generation and meshing.

/// Side length of a chunk in blocks. Chunks are one block tall.
pub const CHUNK_SIZE: u32 = 16;

/// Number of block instances held by one chunk (16 x 16).
pub const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Largest chunk-local coordinate on the X and Z axes.
pub const CHUNK_EDGE: i32 = CHUNK_SIZE as i32 - 1;

/// String id of the air definition. Always registered as numeric id 0.
pub const AIR_BLOCK_ID: &str = "bunker:air_block";

/// Name returned for numeric ids that have no definition.
pub const UNKNOWN_BLOCK_NAME: &str = "unknown";

/// Default replace target for ore configs.
pub const STONE_BLOCK_ID: &str = "bunker:stone_block";
pub const DIRT_BLOCK_ID: &str = "bunker:dirt_block";
pub const GRASS_BLOCK_ID: &str = "bunker:grass_block";
pub const LOG_BLOCK_ID: &str = "bunker:oak_tree_log_block";
pub const LEAVES_BLOCK_ID: &str = "bunker:oak_tree_leaves_block";

/// Pathfinding cost reported for blocks that do not define one.
pub const DEFAULT_MOVEMENT_COST: f32 = 1.0;

/// Per-step seed offsets added to the world seed. Ore configs carry their own.
pub mod seed_offsets {
    pub const HEIGHT: u32 = 0;
    pub const CAVE: u32 = 2;
    pub const VEGETATION: u32 = 3;
    /// Surface variation (grass or dirt on top).
    pub const SURFACE_VARIATION: u32 = 4;
    /// Sparse tree-density field, sampled alongside the vegetation field.
    pub const TREE_DENSITY: u32 = 5;
    pub const HEDGE: u32 = 6;
}
