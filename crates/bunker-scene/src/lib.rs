//! Runtime facade over a generated world: chunk meshes, block edits,
//! the elevation cutaway and world building.

pub mod accessor;
pub mod builder;
pub mod chunk_meshes;
pub mod felling;
pub mod raycast;
pub mod visibility;
pub mod world;

pub use accessor::{dirty_chunks, BlockAccessor, EditError, MineOutcome};
pub use builder::{build_blocking, BackgroundBuild, BuildError, BuildPhase, BuildProgress, WorldBuilder};
pub use chunk_meshes::{ChunkMeshCache, ChunkRenderState, RaycastLayer};
pub use felling::{FallImpulse, FallingTree, FelledTree};
pub use raycast::{raycast, RayHit};
pub use visibility::VisibilityController;
pub use world::GameWorld;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use bunker_blocks::loader::load_blocks_from_str;
    use bunker_blocks::{BlockRegistry, TextureAtlas};
    use bunker_core::block::BlockDefinition;
    use bunker_world::{GeneratedWorld, HeightMap, TreeList, VoxelStore, WorldGenSettings};
    use glam::IVec3;

    use crate::world::GameWorld;

    pub const STONE: &str = "bunker:stone_block";

    const BASE_BLOCKS: &str = include_str!("../../../data/blocks/base_blocks.ron");

    /// Base blocks plus an unmineable floor block.
    pub fn registry() -> Arc<BlockRegistry> {
        let mut defs = load_blocks_from_str(BASE_BLOCKS).expect("base blocks parse");
        defs.push(BlockDefinition {
            is_mineable: false,
            ..BlockDefinition::new("bunker:bedrock_block")
        });
        Arc::new(BlockRegistry::from_definitions(defs))
    }

    /// Stone from the bottom of the world up to and including y = 3.
    pub fn flat_world(max_x: u32, max_y: i32, max_z: u32, min_elevation: i32) -> GameWorld {
        let registry = registry();
        let stone = registry.numeric_of(STONE);
        let settings = WorldGenSettings::with_dims(max_x, max_y, max_z, min_elevation);
        let mut store = VoxelStore::initialise(settings.dims(), Arc::clone(&registry));
        let mut heights = HeightMap::new(max_x, max_z);
        for x in 0..max_x as i32 {
            for z in 0..max_z as i32 {
                for y in min_elevation..=3 {
                    store.set_block(IVec3::new(x, y, z), stone);
                }
                heights.set(x, z, 4);
            }
        }
        let generated = GeneratedWorld {
            store,
            heights,
            trees: TreeList::new(),
            settings,
        };
        GameWorld::from_generated(generated, Arc::new(TextureAtlas::empty()))
    }
}
