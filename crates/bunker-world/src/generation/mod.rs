//! World generation: an ordered pipeline of steps over chunk columns.
//!
//! Each step derives its own noise seed from the world seed plus a fixed
//! offset (see `bunker_core::constants::seed_offsets`). Steps run strictly
//! in order because later steps read the height map written by the first.

pub mod cave;
pub mod context;
pub mod hedge;
pub mod height_map;
pub mod ore;
pub mod pipeline;
pub mod vegetation;

use std::sync::Arc;

use bunker_blocks::BlockRegistry;
use bunker_core::ore::OreConfig;

pub use context::{ChunkColumn, HeightMap, ResolvedBlocks, WorldGenContext};
pub use pipeline::{GenerationPipeline, GenerationStep, PipelineProgress};

use crate::error::WorldGenError;
use crate::settings::WorldGenSettings;
use crate::store::VoxelStore;
use crate::tree::TreeList;

/// The result of a finished generation.
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    pub store: VoxelStore,
    pub heights: HeightMap,
    pub trees: TreeList,
    pub settings: WorldGenSettings,
}

/// Owns the store, context and pipeline of one generation run.
///
/// Construction validates the settings and resolves every required block
/// before the store is allocated, so a failed configuration never leaves a
/// half-written world behind.
#[derive(Debug)]
pub struct WorldGenerator {
    store: VoxelStore,
    ctx: WorldGenContext,
    pipeline: GenerationPipeline,
}

impl WorldGenerator {
    pub fn new(
        settings: WorldGenSettings,
        registry: Arc<BlockRegistry>,
        ores: Vec<OreConfig>,
    ) -> Result<Self, WorldGenError> {
        Self::with_pipeline(settings, registry, GenerationPipeline::standard(ores))
    }

    pub fn with_pipeline(
        settings: WorldGenSettings,
        registry: Arc<BlockRegistry>,
        pipeline: GenerationPipeline,
    ) -> Result<Self, WorldGenError> {
        let ctx = WorldGenContext::new(settings, Arc::clone(&registry))?;
        let store = VoxelStore::initialise(ctx.settings.dims(), registry);
        log::info!(
            "World generator ready: {}x{}x{} from y={}, seed {}",
            ctx.settings.max_x,
            ctx.settings.max_y - ctx.settings.min_elevation,
            ctx.settings.max_z,
            ctx.settings.min_elevation,
            ctx.settings.seed
        );
        Ok(Self { store, ctx, pipeline })
    }

    /// Advance generation by at most `columns` chunk columns.
    pub fn step(&mut self, columns: usize) -> PipelineProgress {
        self.pipeline.step(&mut self.store, &mut self.ctx, columns)
    }

    pub fn is_finished(&self) -> bool {
        self.pipeline.is_finished()
    }

    pub fn progress(&self) -> PipelineProgress {
        self.pipeline.progress()
    }

    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    pub fn context(&self) -> &WorldGenContext {
        &self.ctx
    }

    /// Run whatever is left and hand over the world.
    pub fn finish(mut self) -> GeneratedWorld {
        self.pipeline.run(&mut self.store, &mut self.ctx);
        GeneratedWorld {
            store: self.store,
            heights: self.ctx.heights,
            trees: self.ctx.trees,
            settings: self.ctx.settings,
        }
    }
}

/// Generate a whole world in one call.
pub fn generate(
    settings: WorldGenSettings,
    registry: Arc<BlockRegistry>,
    ores: Vec<OreConfig>,
) -> Result<GeneratedWorld, WorldGenError> {
    Ok(WorldGenerator::new(settings, registry, ores)?.finish())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use bunker_core::block::BlockDefinition;
    use bunker_core::constants::{
        DIRT_BLOCK_ID, GRASS_BLOCK_ID, LEAVES_BLOCK_ID, LOG_BLOCK_ID, STONE_BLOCK_ID,
    };

    pub const COAL: &str = "bunker:coal_ore_block";
    pub const IRON: &str = "bunker:iron_ore_block";

    pub fn registry() -> Arc<BlockRegistry> {
        Arc::new(BlockRegistry::from_definitions(
            [
                STONE_BLOCK_ID,
                DIRT_BLOCK_ID,
                GRASS_BLOCK_ID,
                LOG_BLOCK_ID,
                LEAVES_BLOCK_ID,
                COAL,
                IRON,
            ]
            .into_iter()
            .map(BlockDefinition::new),
        ))
    }

    pub fn context(settings: WorldGenSettings, registry: Arc<BlockRegistry>) -> (VoxelStore, WorldGenContext) {
        let store = VoxelStore::initialise(settings.dims(), Arc::clone(&registry));
        let ctx = WorldGenContext::new(settings, registry).expect("valid test settings");
        (store, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{registry, COAL, IRON};
    use super::*;
    use bunker_core::constants::LOG_BLOCK_ID;
    use glam::IVec3;

    fn ores() -> Vec<OreConfig> {
        let mut coal = OreConfig::new(COAL);
        coal.max_depth = 30;
        let mut iron = OreConfig::new(IRON);
        iron.threshold = 0.4;
        iron.seed_offset = 2;
        vec![coal, iron]
    }

    fn settings() -> WorldGenSettings {
        WorldGenSettings::with_dims(32, 32, 32, -16)
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate(settings(), registry(), ores()).expect("generates");
        let b = generate(settings(), registry(), ores()).expect("generates");
        assert_eq!(a.store.fingerprint(), b.store.fingerprint());
        assert_eq!(a.heights, b.heights);
        assert_eq!(a.trees.len(), b.trees.len());
    }

    #[test]
    fn test_different_seed_differs() {
        let a = generate(settings(), registry(), ores()).expect("generates");
        let mut other = settings();
        other.seed = 7;
        let b = generate(other, registry(), ores()).expect("generates");
        assert_ne!(a.store.fingerprint(), b.store.fingerprint());
    }

    #[test]
    fn test_batched_equals_one_shot() {
        let one_shot = generate(settings(), registry(), ores()).expect("generates");

        let mut generator = WorldGenerator::new(settings(), registry(), ores()).expect("valid");
        let mut calls = 0;
        while !generator.step(1).finished {
            calls += 1;
        }
        assert!(calls > 4);
        let batched = generator.finish();
        assert_eq!(batched.store.fingerprint(), one_shot.store.fingerprint());
        assert_eq!(batched.heights, one_shot.heights);
    }

    #[test]
    fn test_misaligned_world_fails_before_allocation() {
        let err = WorldGenerator::new(WorldGenSettings::with_dims(30, 16, 32, 0), registry(), ores())
            .expect_err("misaligned");
        assert!(matches!(err, WorldGenError::NotChunkAligned { axis: "X", value: 30, .. }));
    }

    #[test]
    fn test_generated_world_has_expected_shape() {
        let world = generate(settings(), registry(), ores()).expect("generates");
        assert_eq!(world.store.chunk_count(), 4 * 48);
        let registry = registry();
        // Bottom slice is always stone or ore, never carved.
        for x in 0..32 {
            for z in 0..32 {
                assert!(world.store.is_solid(IVec3::new(x, -16, z)));
            }
        }
        for tree in world.trees.iter() {
            for &log in &tree.logs {
                assert_eq!(world.store.block_id(log), registry.lookup(LOG_BLOCK_ID));
            }
        }
    }
}
