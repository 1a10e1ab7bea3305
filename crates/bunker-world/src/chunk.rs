use bunker_blocks::BlockRegistry;
use bunker_core::constants::CHUNK_AREA;
use bunker_core::math::{chunk_origin, index_to_local, local_index};
use bunker_core::types::{BlockId, ChunkKey};
use glam::IVec3;

/// One cell of the grid. The solidity flag always mirrors the definition's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInstance {
    block: BlockId,
    is_solid: bool,
    position: IVec3,
}

impl BlockInstance {
    pub fn air(position: IVec3) -> Self {
        Self {
            block: BlockId::AIR,
            is_solid: false,
            position,
        }
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn is_solid(&self) -> bool {
        self.is_solid
    }

    /// Absolute world position of this cell.
    pub fn position(&self) -> IVec3 {
        self.position
    }

    /// Point this cell at another definition, copying its solidity.
    pub fn set_definition(&mut self, block: BlockId, registry: &BlockRegistry) {
        self.block = block;
        self.is_solid = registry.is_solid(block);
    }
}

/// A 16 x 16 layer of blocks at one world Y.
#[derive(Debug, Clone)]
pub struct Chunk {
    key: ChunkKey,
    blocks: Vec<BlockInstance>,
}

impl Chunk {
    /// All-air chunk with every cell's absolute position recorded.
    pub fn new(key: ChunkKey) -> Self {
        let (ox, oz) = chunk_origin(key.chunk_x, key.chunk_z);
        let blocks = (0..CHUNK_AREA)
            .map(|i| {
                let (lx, lz) = index_to_local(i);
                BlockInstance::air(IVec3::new(ox + lx, key.y, oz + lz))
            })
            .collect();
        Self { key, blocks }
    }

    pub fn key(&self) -> ChunkKey {
        self.key
    }

    /// World position of local (0, 0).
    pub fn origin(&self) -> IVec3 {
        let (ox, oz) = chunk_origin(self.key.chunk_x, self.key.chunk_z);
        IVec3::new(ox, self.key.y, oz)
    }

    pub fn get(&self, local_x: i32, local_z: i32) -> Option<&BlockInstance> {
        if !Self::local_in_range(local_x, local_z) {
            return None;
        }
        self.blocks.get(local_index(local_x, local_z))
    }

    pub fn get_mut(&mut self, local_x: i32, local_z: i32) -> Option<&mut BlockInstance> {
        if !Self::local_in_range(local_x, local_z) {
            return None;
        }
        self.blocks.get_mut(local_index(local_x, local_z))
    }

    pub fn blocks(&self) -> &[BlockInstance] {
        &self.blocks
    }

    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_solid()).count()
    }

    fn local_in_range(local_x: i32, local_z: i32) -> bool {
        let cs = bunker_core::constants::CHUNK_SIZE as i32;
        (0..cs).contains(&local_x) && (0..cs).contains(&local_z)
    }
}
