//! The single mutation surface for gameplay code.
//!
//! Every write goes through [`BlockAccessor`], which holds the only mutable
//! borrow of the store and the mesh cache for as long as it lives. A remesh
//! therefore never observes a half-written chunk.

use bunker_core::block::BlockDefinition;
use bunker_core::math::{block_to_local, chunk_key_of, edge_side};
use bunker_core::types::{BlockId, ChunkKey, WorldCoord};
use bunker_mesh::ChunkMesher;
use bunker_world::{BlockInstance, TreeList, VoxelStore};
use glam::IVec3;
use rayon::prelude::*;
use thiserror::Error;

use crate::chunk_meshes::ChunkMeshCache;
use crate::felling::{self, FelledTree};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Position {0} is outside the world")]
    OutOfBounds(IVec3),
    #[error("Position {0} is already occupied")]
    Occupied(IVec3),
    #[error("Nothing to mine at {0}")]
    Air(IVec3),
    #[error("Block at {0} cannot be mined")]
    NotMineable(IVec3),
    #[error("Unknown block '{0}'")]
    UnknownBlock(String),
    #[error("Block '{0}' cannot be placed")]
    NotPlaceable(String),
}

/// What a successful `mine` did.
#[derive(Debug, Clone)]
pub struct MineOutcome {
    pub block: BlockId,
    pub dirty: Vec<ChunkKey>,
    /// `(block_id, quantity)` pairs rolled from the mined block's drop table.
    pub drops: Vec<(String, u32)>,
    /// Set when the mined block was a log of a recorded tree.
    pub felled: Option<FelledTree>,
}

/// Chunks whose meshes change when the block at `pos` changes.
///
/// Always the owning chunk and the chunks directly above and below it. A
/// block on a chunk's X or Z edge also dirties the chunk across that edge.
/// Chunks outside the world are left out. Sorted, no duplicates.
///
/// Diagonal neighbours (across an edge and one slice up or down) are never
/// included: no face of theirs touches `pos`.
pub fn dirty_chunks(store: &VoxelStore, pos: WorldCoord) -> Vec<ChunkKey> {
    if !store.in_bounds(pos) {
        return Vec::new();
    }
    let key = chunk_key_of(pos);
    let mut keys = vec![key, key.with_y(pos.y + 1), key.with_y(pos.y - 1)];

    let side_x = edge_side(block_to_local(pos.x));
    if side_x != 0 {
        keys.push(key.offset(side_x, 0));
    }
    let side_z = edge_side(block_to_local(pos.z));
    if side_z != 0 {
        keys.push(key.offset(0, side_z));
    }

    keys.retain(|k| store.chunk(*k).is_some());
    keys.sort();
    keys.dedup();
    keys
}

pub struct BlockAccessor<'a> {
    pub(crate) store: &'a mut VoxelStore,
    pub(crate) trees: &'a mut TreeList,
    pub(crate) mesher: &'a ChunkMesher,
    meshes: &'a mut ChunkMeshCache,
    cutaway: i32,
}

impl<'a> BlockAccessor<'a> {
    /// `cutaway` is the visible top slice; its chunks are remeshed with
    /// forced top faces.
    pub fn new(
        store: &'a mut VoxelStore,
        trees: &'a mut TreeList,
        mesher: &'a ChunkMesher,
        meshes: &'a mut ChunkMeshCache,
        cutaway: i32,
    ) -> Self {
        Self {
            store,
            trees,
            mesher,
            meshes,
            cutaway,
        }
    }

    pub fn store(&self) -> &VoxelStore {
        self.store
    }

    pub fn trees(&self) -> &TreeList {
        self.trees
    }

    pub fn get(&self, pos: WorldCoord) -> Option<&BlockInstance> {
        self.store.get_block(pos)
    }

    pub fn definition(&self, pos: WorldCoord) -> Option<&BlockDefinition> {
        let id = self.store.block_id(pos)?;
        Some(self.store.registry().resolve(id))
    }

    /// Write a block and remesh the dirty chunks. `None` when `pos` is
    /// outside the world.
    pub fn set(&mut self, pos: WorldCoord, block: BlockId) -> Option<Vec<ChunkKey>> {
        if !self.set_no_remesh(pos, block) {
            return None;
        }
        let dirty = dirty_chunks(self.store, pos);
        self.remesh(&dirty);
        Some(dirty)
    }

    /// [`BlockAccessor::set`] by string id.
    pub fn set_by_id(&mut self, pos: WorldCoord, id: &str) -> Result<Vec<ChunkKey>, EditError> {
        let block = self
            .store
            .registry()
            .lookup(id)
            .ok_or_else(|| EditError::UnknownBlock(id.to_string()))?;
        self.set(pos, block).ok_or(EditError::OutOfBounds(pos))
    }

    /// Write a block without touching any mesh.
    pub fn set_no_remesh(&mut self, pos: WorldCoord, block: BlockId) -> bool {
        self.store.set_block(pos, block)
    }

    /// Apply several writes and remesh the union of their dirty sets once.
    /// Out-of-bounds writes are skipped.
    pub fn set_many(&mut self, edits: &[(WorldCoord, BlockId)]) -> Vec<ChunkKey> {
        let mut dirty = Vec::new();
        for &(pos, block) in edits {
            if self.set_no_remesh(pos, block) {
                dirty.extend(dirty_chunks(self.store, pos));
            }
        }
        dirty.sort();
        dirty.dedup();
        self.remesh(&dirty);
        dirty
    }

    /// Rebuild the given chunks and replace their cached meshes.
    pub fn remesh(&mut self, keys: &[ChunkKey]) {
        let store: &VoxelStore = &*self.store;
        let mesher = self.mesher;
        let cutaway = self.cutaway;
        let built: Vec<_> = keys
            .par_iter()
            .filter_map(|&key| {
                let force_top = key.y == cutaway;
                mesher
                    .build_key(key, store, force_top)
                    .map(|mesh| (key, mesh, force_top))
            })
            .collect();
        for (key, mesh, force_top) in built {
            log::debug!("Remeshed {} ({} faces)", key, mesh.face_count());
            self.meshes.insert(key, mesh, force_top);
        }
    }

    /// Put a block into an empty cell.
    pub fn place(&mut self, pos: WorldCoord, block: BlockId) -> Result<Vec<ChunkKey>, EditError> {
        if !self.store.in_bounds(pos) {
            return Err(EditError::OutOfBounds(pos));
        }
        let registry = self.store.registry();
        let def = registry
            .get_by_numeric(block)
            .ok_or_else(|| EditError::UnknownBlock(registry.string_of(block).to_string()))?;
        if !def.is_solid || def.is_air() {
            return Err(EditError::NotPlaceable(def.id.clone()));
        }
        if self.store.is_solid(pos) {
            return Err(EditError::Occupied(pos));
        }
        self.set(pos, block).ok_or(EditError::OutOfBounds(pos))
    }

    /// Remove a block and roll its drops. Logs of recorded trees fell the
    /// tree from that point up.
    pub fn mine(&mut self, pos: WorldCoord, rng: &mut fastrand::Rng) -> Result<MineOutcome, EditError> {
        let block = self.store.block_id(pos).ok_or(EditError::OutOfBounds(pos))?;
        let def = self.store.registry().resolve(block);
        if !def.is_solid {
            return Err(EditError::Air(pos));
        }
        if !def.is_mineable {
            return Err(EditError::NotMineable(pos));
        }
        let drops = def.roll_drops(rng);

        if self.trees.find_by_log(pos).is_some() {
            if let Some(felled) = felling::fell_tree(self, pos, rng) {
                log::debug!(
                    "Felled tree {} at {}: {} logs, {} leaves",
                    felled.tree_id,
                    pos,
                    felled.removed_logs.len(),
                    felled.removed_leaves.len()
                );
                return Ok(MineOutcome {
                    block,
                    dirty: felled.dirty.clone(),
                    drops,
                    felled: Some(felled),
                });
            }
        }

        let dirty = self.set(pos, BlockId::AIR).ok_or(EditError::OutOfBounds(pos))?;
        Ok(MineOutcome {
            block,
            dirty,
            drops,
            felled: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{flat_world, STONE};
    use bunker_core::constants::LOG_BLOCK_ID;

    #[test]
    fn test_interior_set_dirties_three_chunks() {
        let mut world = flat_world(32, 24, 32, 0);
        let dirt = world.store().registry().numeric_of("bunker:dirt_block");
        let mut acc = world.accessor();
        let dirty = acc.set(IVec3::new(5, 10, 6), dirt).expect("in bounds");
        assert_eq!(
            dirty,
            vec![
                ChunkKey::new(0, 0, 9),
                ChunkKey::new(0, 0, 10),
                ChunkKey::new(0, 0, 11),
            ]
        );
    }

    #[test]
    fn test_boundary_set_dirties_neighbour() {
        let mut world = flat_world(32, 24, 32, 0);
        let mut acc = world.accessor();
        let dirty = acc.set(IVec3::new(16, 10, 15), BlockId::AIR).expect("in bounds");
        // Local x = 0 of chunk (1, 0) and local z = 15 of the same chunk.
        assert_eq!(
            dirty,
            vec![
                ChunkKey::new(0, 0, 10),
                ChunkKey::new(1, 0, 9),
                ChunkKey::new(1, 0, 10),
                ChunkKey::new(1, 0, 11),
                ChunkKey::new(1, 1, 10),
            ]
        );
        assert!(!dirty.contains(&ChunkKey::new(0, 0, 9)));
        assert!(!dirty.contains(&ChunkKey::new(0, 0, 11)));
    }

    #[test]
    fn test_corner_of_world_drops_missing_chunks() {
        let mut world = flat_world(32, 24, 32, 0);
        let mut acc = world.accessor();
        let dirty = acc.set(IVec3::new(0, 0, 0), BlockId::AIR).expect("in bounds");
        assert_eq!(dirty, vec![ChunkKey::new(0, 0, 0), ChunkKey::new(0, 0, 1)]);
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut world = flat_world(32, 8, 32, -4);
        let registry = world.store().registry().clone();
        let mut acc = world.accessor();
        for (id, def) in registry.iter() {
            for pos in [IVec3::new(0, -4, 0), IVec3::new(31, 7, 31), IVec3::new(16, 0, 15)] {
                acc.set(pos, id).expect("in bounds");
                assert_eq!(acc.get(pos).expect("block").block(), id);
                assert_eq!(acc.definition(pos).expect("def").id, def.id);
                assert_eq!(acc.get(pos).expect("block").is_solid(), def.is_solid);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let mut world = flat_world(16, 8, 16, 0);
        let mut acc = world.accessor();
        for pos in [IVec3::new(-1, 0, 0), IVec3::new(0, 8, 0), IVec3::new(0, -1, 0), IVec3::new(0, 0, 16)] {
            assert!(acc.get(pos).is_none());
            assert!(acc.set(pos, BlockId::AIR).is_none());
            assert!(!acc.set_no_remesh(pos, BlockId::AIR));
            assert!(dirty_chunks(acc.store(), pos).is_empty());
        }
        assert_eq!(
            acc.set_by_id(IVec3::new(0, 0, 0), "bunker:nope"),
            Err(EditError::UnknownBlock("bunker:nope".to_string()))
        );
    }

    #[test]
    fn test_remesh_replaces_cached_mesh() {
        let mut world = flat_world(16, 8, 16, 0);
        let key = ChunkKey::new(0, 0, 3);
        let before = world.meshes().get(key).expect("cached").mesh.face_count();
        let mut acc = world.accessor();
        acc.set(IVec3::new(8, 3, 8), BlockId::AIR).expect("in bounds");
        let state = world.meshes().get(key).expect("cached");
        assert_eq!(state.rebuilds, 1);
        // One top face lost, four walls around the hole gained.
        assert_eq!(state.mesh.face_count(), before + 3);
        let below = world.meshes().get(ChunkKey::new(0, 0, 2)).expect("cached");
        assert_eq!(below.rebuilds, 1);
    }

    #[test]
    fn test_set_no_remesh_leaves_meshes() {
        let mut world = flat_world(16, 8, 16, 0);
        let mut acc = world.accessor();
        assert!(acc.set_no_remesh(IVec3::new(8, 3, 8), BlockId::AIR));
        assert!(world.meshes().iter().all(|(_, s)| s.rebuilds == 0));
    }

    #[test]
    fn test_set_many_remeshes_union_once() {
        let mut world = flat_world(32, 8, 16, 0);
        let mut acc = world.accessor();
        let dirty = acc.set_many(&[
            (IVec3::new(3, 4, 3), BlockId::AIR),
            (IVec3::new(4, 4, 3), BlockId::AIR),
            (IVec3::new(99, 4, 3), BlockId::AIR),
        ]);
        assert_eq!(dirty.len(), 3);
        assert!(world.meshes().iter().all(|(_, s)| s.rebuilds <= 1));
    }

    #[test]
    fn test_place_rules() {
        let mut world = flat_world(16, 8, 16, 0);
        let stone = world.store().registry().numeric_of(STONE);
        let mut acc = world.accessor();
        assert_eq!(acc.place(IVec3::new(2, 3, 2), stone), Err(EditError::Occupied(IVec3::new(2, 3, 2))));
        assert_eq!(
            acc.place(IVec3::new(2, 7, 2), BlockId::AIR),
            Err(EditError::NotPlaceable("bunker:air_block".to_string()))
        );
        assert_eq!(acc.place(IVec3::new(2, 8, 2), stone), Err(EditError::OutOfBounds(IVec3::new(2, 8, 2))));
        assert!(acc.place(IVec3::new(2, 7, 2), stone).is_ok());
        assert!(acc.store().is_solid(IVec3::new(2, 7, 2)));
    }

    #[test]
    fn test_mine_rules() {
        let mut world = flat_world(16, 8, 16, 0);
        let mut rng = fastrand::Rng::with_seed(1);
        let mut acc = world.accessor();
        assert_eq!(
            acc.mine(IVec3::new(2, 7, 2), &mut rng).map(|o| o.block),
            Err(EditError::Air(IVec3::new(2, 7, 2)))
        );
        let outcome = acc.mine(IVec3::new(2, 3, 2), &mut rng).expect("mined");
        assert_eq!(outcome.drops, vec![("bunker:stone_block".to_string(), 1)]);
        assert!(outcome.felled.is_none());
        assert!(!acc.store().is_solid(IVec3::new(2, 3, 2)));

        let bedrock = acc.store().registry().numeric_of("bunker:bedrock_block");
        acc.set(IVec3::new(2, 3, 2), bedrock).expect("in bounds");
        assert_eq!(
            acc.mine(IVec3::new(2, 3, 2), &mut rng).map(|o| o.block),
            Err(EditError::NotMineable(IVec3::new(2, 3, 2)))
        );
    }

    #[test]
    fn test_mining_unrecorded_log_is_plain() {
        let mut world = flat_world(16, 8, 16, 0);
        let log = world.store().registry().numeric_of(LOG_BLOCK_ID);
        let mut rng = fastrand::Rng::with_seed(1);
        let mut acc = world.accessor();
        acc.set(IVec3::new(5, 5, 5), log).expect("in bounds");
        let outcome = acc.mine(IVec3::new(5, 5, 5), &mut rng).expect("mined");
        assert!(outcome.felled.is_none());
        assert_eq!(outcome.dirty.len(), 3);
    }
}
