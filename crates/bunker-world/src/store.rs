use std::sync::Arc;

use bunker_blocks::BlockRegistry;
use bunker_core::math::{block_to_chunk, block_to_local, chunks_to_cover};
use bunker_core::types::{BlockId, ChunkKey, WorldCoord};
use glam::IVec3;

use crate::chunk::{BlockInstance, Chunk};

/// World extents. X and Z run over [0, max), Y over [min_elevation, max_y).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldDims {
    pub max_x: u32,
    pub max_y: i32,
    pub max_z: u32,
    pub min_elevation: i32,
}

impl WorldDims {
    pub fn new(max_x: u32, max_y: i32, max_z: u32, min_elevation: i32) -> Self {
        Self {
            max_x,
            max_y,
            max_z,
            min_elevation,
        }
    }

    pub fn slice_count(&self) -> usize {
        (self.max_y - self.min_elevation).max(0) as usize
    }

    /// World Y of the topmost slice.
    pub fn max_elevation(&self) -> i32 {
        self.max_y - 1
    }

    pub fn contains(&self, pos: WorldCoord) -> bool {
        pos.x >= 0
            && (pos.x as u32) < self.max_x
            && pos.z >= 0
            && (pos.z as u32) < self.max_z
            && pos.y >= self.min_elevation
            && pos.y < self.max_y
    }

    pub fn contains_column(&self, x: i32, z: i32) -> bool {
        x >= 0 && (x as u32) < self.max_x && z >= 0 && (z as u32) < self.max_z
    }
}

/// All chunks sharing one world Y.
#[derive(Debug, Clone)]
pub struct Slice {
    y: i32,
    chunks: Vec<Chunk>,
}

impl Slice {
    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }
}

/// The sliced, chunked grid of block instances.
///
/// Slices are indexed by `y - min_elevation`; inside a slice, chunks are
/// stored chunk-X major.
#[derive(Debug, Clone)]
pub struct VoxelStore {
    dims: WorldDims,
    chunks_x: u32,
    chunks_z: u32,
    slices: Vec<Slice>,
    registry: Arc<BlockRegistry>,
}

impl VoxelStore {
    /// Allocate every slice and chunk, all air.
    pub fn initialise(dims: WorldDims, registry: Arc<BlockRegistry>) -> Self {
        let chunks_x = chunks_to_cover(dims.max_x);
        let chunks_z = chunks_to_cover(dims.max_z);

        let slices = (0..dims.slice_count())
            .map(|i| {
                let y = dims.min_elevation + i as i32;
                let mut chunks = Vec::with_capacity((chunks_x * chunks_z) as usize);
                for cx in 0..chunks_x as i32 {
                    for cz in 0..chunks_z as i32 {
                        chunks.push(Chunk::new(ChunkKey::new(cx, cz, y)));
                    }
                }
                Slice { y, chunks }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Initialised voxel store: {} slices of {}x{} chunks",
            slices.len(),
            chunks_x,
            chunks_z
        );

        Self {
            dims,
            chunks_x,
            chunks_z,
            slices,
            registry,
        }
    }

    pub fn dims(&self) -> WorldDims {
        self.dims
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn chunks_x(&self) -> u32 {
        self.chunks_x
    }

    pub fn chunks_z(&self) -> u32 {
        self.chunks_z
    }

    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }

    pub fn chunk_count(&self) -> usize {
        self.slices.iter().map(|s| s.chunks.len()).sum()
    }

    pub fn in_bounds(&self, pos: WorldCoord) -> bool {
        self.dims.contains(pos)
    }

    pub fn slice(&self, y: i32) -> Option<&Slice> {
        let index = y.checked_sub(self.dims.min_elevation)?;
        if index < 0 {
            return None;
        }
        self.slices.get(index as usize)
    }

    pub fn slices(&self) -> impl Iterator<Item = &Slice> {
        self.slices.iter()
    }

    fn chunk_index(&self, chunk_x: i32, chunk_z: i32) -> Option<usize> {
        if chunk_x < 0 || chunk_z < 0 || chunk_x as u32 >= self.chunks_x || chunk_z as u32 >= self.chunks_z {
            return None;
        }
        Some((chunk_x as u32 * self.chunks_z + chunk_z as u32) as usize)
    }

    fn slice_index(&self, y: i32) -> Option<usize> {
        let index = y.checked_sub(self.dims.min_elevation)?;
        if index < 0 || index as usize >= self.slices.len() {
            return None;
        }
        Some(index as usize)
    }

    pub fn chunk(&self, key: ChunkKey) -> Option<&Chunk> {
        let s = self.slice_index(key.y)?;
        let c = self.chunk_index(key.chunk_x, key.chunk_z)?;
        self.slices[s].chunks.get(c)
    }

    pub fn chunk_mut(&mut self, key: ChunkKey) -> Option<&mut Chunk> {
        let s = self.slice_index(key.y)?;
        let c = self.chunk_index(key.chunk_x, key.chunk_z)?;
        self.slices[s].chunks.get_mut(c)
    }

    /// Chunk owning an in-bounds position.
    pub fn chunk_at(&self, pos: WorldCoord) -> Option<&Chunk> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.chunk(ChunkKey::new(block_to_chunk(pos.x), block_to_chunk(pos.z), pos.y))
    }

    /// Every chunk key, slice by slice from the bottom.
    pub fn chunk_keys(&self) -> impl Iterator<Item = ChunkKey> + '_ {
        self.slices
            .iter()
            .flat_map(|s| s.chunks.iter().map(Chunk::key))
    }

    pub fn get_block(&self, pos: WorldCoord) -> Option<&BlockInstance> {
        if !self.in_bounds(pos) {
            return None;
        }
        let chunk = self.chunk(ChunkKey::new(block_to_chunk(pos.x), block_to_chunk(pos.z), pos.y))?;
        chunk.get(block_to_local(pos.x), block_to_local(pos.z))
    }

    pub fn get_block_mut(&mut self, pos: WorldCoord) -> Option<&mut BlockInstance> {
        if !self.in_bounds(pos) {
            return None;
        }
        let chunk = self.chunk_mut(ChunkKey::new(block_to_chunk(pos.x), block_to_chunk(pos.z), pos.y))?;
        chunk.get_mut(block_to_local(pos.x), block_to_local(pos.z))
    }

    pub fn block_id(&self, pos: WorldCoord) -> Option<BlockId> {
        self.get_block(pos).map(BlockInstance::block)
    }

    /// False for out-of-bounds positions.
    pub fn is_solid(&self, pos: WorldCoord) -> bool {
        self.get_block(pos).is_some_and(BlockInstance::is_solid)
    }

    /// Write a definition. Returns false for out-of-bounds positions.
    pub fn set_block(&mut self, pos: WorldCoord, block: BlockId) -> bool {
        let registry = Arc::clone(&self.registry);
        match self.get_block_mut(pos) {
            Some(cell) => {
                cell.set_definition(block, &registry);
                true
            }
            None => false,
        }
    }

    /// First non-solid Y above the highest solid block of a column.
    /// `None` for out-of-bounds columns or columns with no solid block.
    pub fn surface_y(&self, x: i32, z: i32) -> Option<i32> {
        if !self.dims.contains_column(x, z) {
            return None;
        }
        (self.dims.min_elevation..self.dims.max_y)
            .rev()
            .find(|&y| self.is_solid(IVec3::new(x, y, z)))
            .map(|y| y + 1)
    }

    /// Number of cells holding `block`.
    pub fn count_blocks(&self, block: BlockId) -> usize {
        self.slices
            .iter()
            .flat_map(|s| s.chunks.iter())
            .flat_map(|c| c.blocks().iter())
            .filter(|b| b.block() == block)
            .count()
    }

    /// Cell count per numeric id, indexed by id.
    pub fn histogram(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.registry.len()];
        for slice in &self.slices {
            for chunk in &slice.chunks {
                for b in chunk.blocks() {
                    if let Some(c) = counts.get_mut(b.block().index()) {
                        *c += 1;
                    }
                }
            }
        }
        counts
    }

    /// FNV-1a hash over every cell id in storage order. Equal grids hash equal.
    pub fn fingerprint(&self) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for slice in &self.slices {
            for chunk in &slice.chunks {
                for b in chunk.blocks() {
                    for byte in b.block().0.to_le_bytes() {
                        hash ^= byte as u64;
                        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
                    }
                }
            }
        }
        hash
    }
}
