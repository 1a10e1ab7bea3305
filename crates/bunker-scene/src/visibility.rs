//! Elevation cutaway.
//!
//! Slices above the current elevation are hidden and ignored by raycasts.
//! The slice at the current elevation is the boundary and is meshed with
//! forced top faces so the cut looks capped.

use bunker_mesh::ChunkMesher;
use bunker_world::{VoxelStore, WorldDims};

use crate::chunk_meshes::ChunkMeshCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityController {
    min: i32,
    max: i32,
    current: i32,
}

impl VisibilityController {
    /// Starts fully raised, at the world's top slice.
    pub fn new(dims: WorldDims) -> Self {
        let max = dims.max_elevation();
        let min = (dims.min_elevation + 1).min(max);
        Self { min, max, current: max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn bounds(&self) -> (i32, i32) {
        (self.min, self.max)
    }

    pub fn is_visible(&self, y: i32) -> bool {
        y <= self.current
    }

    pub fn raise(&mut self, store: &VoxelStore, mesher: &ChunkMesher, meshes: &mut ChunkMeshCache) -> bool {
        self.set_elevation(self.current + 1, store, mesher, meshes)
    }

    pub fn lower(&mut self, store: &VoxelStore, mesher: &ChunkMesher, meshes: &mut ChunkMeshCache) -> bool {
        self.set_elevation(self.current - 1, store, mesher, meshes)
    }

    /// Move the cutaway to `target`, clamped to the bounds. Returns false
    /// when nothing changed.
    pub fn set_elevation(
        &mut self,
        target: i32,
        store: &VoxelStore,
        mesher: &ChunkMesher,
        meshes: &mut ChunkMeshCache,
    ) -> bool {
        let target = target.clamp(self.min, self.max);
        if target == self.current {
            return false;
        }
        let previous = self.current;
        self.current = target;

        meshes.apply_cutaway(target);
        rebuild_slice(store, mesher, meshes, target, true);
        // The old boundary loses its forced tops.
        rebuild_slice(store, mesher, meshes, previous, false);

        log::debug!("Cutaway elevation {} -> {}", previous, target);
        true
    }

    /// Re-apply the current state to every cached chunk.
    pub fn refresh(&self, store: &VoxelStore, mesher: &ChunkMesher, meshes: &mut ChunkMeshCache) {
        meshes.apply_cutaway(self.current);
        rebuild_slice(store, mesher, meshes, self.current, true);
    }
}

fn rebuild_slice(store: &VoxelStore, mesher: &ChunkMesher, meshes: &mut ChunkMeshCache, y: i32, force_top: bool) {
    for (key, mesh) in mesher.build_slice(store, y, force_top) {
        meshes.insert(key, mesh, force_top);
    }
}
