use std::sync::Arc;

use bunker_blocks::BlockRegistry;
use bunker_core::constants::CHUNK_SIZE;
use bunker_core::math::chunk_origin;
use bunker_core::types::BlockId;

use crate::error::WorldGenError;
use crate::settings::{StandardBlocks, WorldGenSettings};
use crate::tree::TreeList;

/// Terrain height per column, as written by the height map step.
///
/// The height is the first Y above the column's terrain; the topmost terrain
/// block sits at `height - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightMap {
    size_x: u32,
    size_z: u32,
    heights: Vec<i32>,
}

impl HeightMap {
    pub fn new(size_x: u32, size_z: u32) -> Self {
        Self {
            size_x,
            size_z,
            heights: vec![0; (size_x * size_z) as usize],
        }
    }

    fn index(&self, x: i32, z: i32) -> Option<usize> {
        if x < 0 || z < 0 || x as u32 >= self.size_x || z as u32 >= self.size_z {
            return None;
        }
        Some((x as u32 * self.size_z + z as u32) as usize)
    }

    pub fn get(&self, x: i32, z: i32) -> Option<i32> {
        self.index(x, z).map(|i| self.heights[i])
    }

    pub fn set(&mut self, x: i32, z: i32, height: i32) -> bool {
        match self.index(x, z) {
            Some(i) => {
                self.heights[i] = height;
                true
            }
            None => false,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.size_x, self.size_z)
    }

    /// Heights in X-major order.
    pub fn as_slice(&self) -> &[i32] {
        &self.heights
    }

    pub fn max(&self) -> Option<i32> {
        self.heights.iter().copied().max()
    }

    pub fn min(&self) -> Option<i32> {
        self.heights.iter().copied().min()
    }
}

/// Numeric ids of the standard blocks, resolved once per generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBlocks {
    pub stone: BlockId,
    pub dirt: BlockId,
    pub grass: BlockId,
    pub log: BlockId,
    pub leaves: BlockId,
}

impl ResolvedBlocks {
    pub fn resolve(names: &StandardBlocks, registry: &BlockRegistry) -> Result<Self, WorldGenError> {
        let get = |id: &str| {
            registry
                .lookup(id)
                .ok_or_else(|| WorldGenError::MissingBlock(id.to_string()))
        };
        Ok(Self {
            stone: get(&names.stone)?,
            dirt: get(&names.dirt)?,
            grass: get(&names.grass)?,
            log: get(&names.log)?,
            leaves: get(&names.leaves)?,
        })
    }
}

/// A vertical column of chunks, the unit of generation work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkColumn {
    pub chunk_x: i32,
    pub chunk_z: i32,
}

impl ChunkColumn {
    /// World (x, z) of every block column inside, local X outer.
    pub fn block_columns(self) -> impl Iterator<Item = (i32, i32)> {
        let (ox, oz) = chunk_origin(self.chunk_x, self.chunk_z);
        let cs = CHUNK_SIZE as i32;
        (0..cs).flat_map(move |lx| (0..cs).map(move |lz| (ox + lx, oz + lz)))
    }
}

/// State threaded through every generation step.
#[derive(Debug, Clone)]
pub struct WorldGenContext {
    pub settings: WorldGenSettings,
    pub registry: Arc<BlockRegistry>,
    pub blocks: ResolvedBlocks,
    pub heights: HeightMap,
    pub trees: TreeList,
}

impl WorldGenContext {
    pub fn new(settings: WorldGenSettings, registry: Arc<BlockRegistry>) -> Result<Self, WorldGenError> {
        settings.validate()?;
        let blocks = ResolvedBlocks::resolve(&settings.blocks, &registry)?;
        let heights = HeightMap::new(settings.max_x, settings.max_z);
        Ok(Self {
            settings,
            registry,
            blocks,
            heights,
            trees: TreeList::new(),
        })
    }

    pub fn seed(&self) -> u32 {
        self.settings.seed
    }

    pub fn frequency(&self) -> f64 {
        self.settings.frequency
    }

    pub fn min_elevation(&self) -> i32 {
        self.settings.min_elevation
    }

    pub fn max_y(&self) -> i32 {
        self.settings.max_y
    }

    /// Every chunk column, chunk X outer and chunk Z inner.
    pub fn columns(&self) -> Vec<ChunkColumn> {
        let cs = CHUNK_SIZE;
        let chunks_x = self.settings.max_x.div_ceil(cs) as i32;
        let chunks_z = self.settings.max_z.div_ceil(cs) as i32;
        (0..chunks_x)
            .flat_map(|chunk_x| (0..chunks_z).map(move |chunk_z| ChunkColumn { chunk_x, chunk_z }))
            .collect()
    }

    /// Height of a column, 0 when out of range.
    pub fn height(&self, x: i32, z: i32) -> i32 {
        self.heights.get(x, z).unwrap_or(0)
    }
}
