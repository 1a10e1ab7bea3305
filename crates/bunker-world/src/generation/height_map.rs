use bunker_core::constants::seed_offsets;
use glam::IVec3;

use super::context::{ChunkColumn, WorldGenContext};
use super::pipeline::GenerationStep;
use crate::noise_source::{self, NoiseSource};
use crate::store::VoxelStore;

/// Terrain height for a noise sample in [-1, 1].
pub fn column_height(noise: f64, max_terrain_height: i32) -> i32 {
    ((noise + 1.0) / 2.0 * max_terrain_height as f64).floor() as i32
}

/// Fills every column from the bottom slice up to its noise height with
/// stone, a dirt band and a grass (or dirt) cap, and records the heights.
#[derive(Debug, Default)]
pub struct HeightMapStep {
    height_noise: Option<NoiseSource>,
    variation_noise: Option<NoiseSource>,
}

impl HeightMapStep {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GenerationStep for HeightMapStep {
    fn name(&self) -> &'static str {
        "height_map"
    }

    fn begin(&mut self, _store: &VoxelStore, ctx: &mut WorldGenContext) {
        let settings = &ctx.settings;
        self.height_noise = Some(noise_source::create(
            settings.frequency,
            settings.seed,
            seed_offsets::HEIGHT,
        ));
        self.variation_noise = Some(noise_source::create(
            settings.frequency * settings.surface_variation_frequency_multiplier,
            settings.seed,
            seed_offsets::SURFACE_VARIATION,
        ));
    }

    fn apply_column(&mut self, store: &mut VoxelStore, ctx: &mut WorldGenContext, column: ChunkColumn) {
        let (Some(height_noise), Some(variation_noise)) = (&self.height_noise, &self.variation_noise) else {
            log::warn!("Height map step applied before begin, skipping {:?}", column);
            return;
        };
        let settings = &ctx.settings;
        let blocks = ctx.blocks;
        let min_y = settings.min_elevation;

        for (x, z) in column.block_columns() {
            let height = column_height(height_noise.column(x, z), settings.max_terrain_height)
                .min(settings.max_y);
            let top = if variation_noise.column(x, z) > settings.surface_variation_threshold {
                blocks.dirt
            } else {
                blocks.grass
            };

            for y in min_y..height {
                let block = if y == height - 1 {
                    top
                } else if y > height - settings.dirt_depth {
                    blocks.dirt
                } else {
                    blocks.stone
                };
                store.set_block(IVec3::new(x, y, z), block);
            }
            ctx.heights.set(x, z, height);
        }
    }
}
