use std::sync::Arc;

use bunker_blocks::TextureAtlas;
use bunker_core::types::{BlockId, ChunkKey, WorldCoord};
use bunker_mesh::{ChunkMesher, MeshBuffers};
use bunker_world::{GeneratedWorld, HeightMap, TreeList, VoxelStore, WorldGenSettings};
use glam::Vec3;

use crate::accessor::{BlockAccessor, EditError, MineOutcome};
use crate::chunk_meshes::ChunkMeshCache;
use crate::raycast::{self, RayHit};
use crate::visibility::VisibilityController;

/// A generated, meshed world ready for interaction.
///
/// Owns the voxel store and every chunk mesh. All edits go through
/// [`GameWorld::accessor`] or the helpers built on it.
#[derive(Debug)]
pub struct GameWorld {
    store: VoxelStore,
    trees: TreeList,
    heights: HeightMap,
    settings: WorldGenSettings,
    atlas: Arc<TextureAtlas>,
    mesher: ChunkMesher,
    meshes: ChunkMeshCache,
    visibility: VisibilityController,
    rng: fastrand::Rng,
}

impl GameWorld {
    /// Mesh every chunk of a finished generation in one go.
    pub fn from_generated(generated: GeneratedWorld, atlas: Arc<TextureAtlas>) -> Self {
        let mesher = ChunkMesher::new(generated.store.registry(), &atlas);
        let visibility = VisibilityController::new(generated.store.dims());
        let built = mesher.build_all(&generated.store, Some(visibility.current()));
        Self::from_parts(generated, atlas, mesher, built)
    }

    pub(crate) fn from_parts(
        generated: GeneratedWorld,
        atlas: Arc<TextureAtlas>,
        mesher: ChunkMesher,
        built: Vec<(ChunkKey, MeshBuffers)>,
    ) -> Self {
        let GeneratedWorld {
            store,
            heights,
            trees,
            settings,
        } = generated;
        let visibility = VisibilityController::new(store.dims());
        let mut meshes = ChunkMeshCache::with_capacity(built.len());
        for (key, mesh) in built {
            let force_top = key.y == visibility.current();
            meshes.insert(key, mesh, force_top);
        }
        meshes.apply_cutaway(visibility.current());
        let rng = fastrand::Rng::with_seed(settings.seed as u64);
        Self {
            store,
            trees,
            heights,
            settings,
            atlas,
            mesher,
            meshes,
            visibility,
            rng,
        }
    }

    pub fn accessor(&mut self) -> BlockAccessor<'_> {
        BlockAccessor::new(
            &mut self.store,
            &mut self.trees,
            &self.mesher,
            &mut self.meshes,
            self.visibility.current(),
        )
    }

    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    pub fn trees(&self) -> &TreeList {
        &self.trees
    }

    pub fn trees_mut(&mut self) -> &mut TreeList {
        &mut self.trees
    }

    pub fn heights(&self) -> &HeightMap {
        &self.heights
    }

    pub fn settings(&self) -> &WorldGenSettings {
        &self.settings
    }

    pub fn atlas(&self) -> &Arc<TextureAtlas> {
        &self.atlas
    }

    pub fn mesher(&self) -> &ChunkMesher {
        &self.mesher
    }

    pub fn meshes(&self) -> &ChunkMeshCache {
        &self.meshes
    }

    pub fn visibility(&self) -> &VisibilityController {
        &self.visibility
    }

    pub fn raise_elevation(&mut self) -> bool {
        self.visibility.raise(&self.store, &self.mesher, &mut self.meshes)
    }

    pub fn lower_elevation(&mut self) -> bool {
        self.visibility.lower(&self.store, &self.mesher, &mut self.meshes)
    }

    pub fn set_elevation(&mut self, y: i32) -> bool {
        self.visibility.set_elevation(y, &self.store, &self.mesher, &mut self.meshes)
    }

    /// Pick against the visible part of the world.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_dist: f32) -> Option<RayHit> {
        raycast::raycast(&self.store, origin, direction, max_dist, Some(self.visibility.current()))
    }

    /// Mine with the world's own drop RNG.
    pub fn mine(&mut self, pos: WorldCoord) -> Result<MineOutcome, EditError> {
        let mut accessor = BlockAccessor::new(
            &mut self.store,
            &mut self.trees,
            &self.mesher,
            &mut self.meshes,
            self.visibility.current(),
        );
        accessor.mine(pos, &mut self.rng)
    }

    pub fn place(&mut self, pos: WorldCoord, block: BlockId) -> Result<Vec<ChunkKey>, EditError> {
        self.accessor().place(pos, block)
    }
}
