use bunker_core::ore::OreConfig;
use bunker_core::types::BlockId;
use glam::IVec3;

use super::context::{ChunkColumn, WorldGenContext};
use super::pipeline::GenerationStep;
use crate::noise_source::NoiseSource;
use crate::store::VoxelStore;

/// An ore config with its block ids resolved and its noise field built.
#[derive(Debug)]
struct ActiveOre {
    config: OreConfig,
    ore: BlockId,
    replace: BlockId,
    noise: NoiseSource,
}

/// Converts replaceable blocks below the surface into ore where each ore's
/// noise field exceeds its threshold.
///
/// Configs apply in list order, so where bands overlap the later config
/// converts last and wins.
#[derive(Debug)]
pub struct OreStep {
    configs: Vec<OreConfig>,
    active: Vec<ActiveOre>,
}

impl OreStep {
    pub fn new(configs: Vec<OreConfig>) -> Self {
        Self {
            configs,
            active: Vec::new(),
        }
    }

    pub fn configs(&self) -> &[OreConfig] {
        &self.configs
    }
}

impl GenerationStep for OreStep {
    fn name(&self) -> &'static str {
        "ore"
    }

    fn begin(&mut self, _store: &VoxelStore, ctx: &mut WorldGenContext) {
        self.active.clear();
        for config in &self.configs {
            let (Some(ore), Some(replace)) = (
                ctx.registry.lookup(&config.ore_block_id),
                ctx.registry.lookup(&config.replace_block_id),
            ) else {
                log::warn!(
                    "Ore config '{}' references an unregistered block, skipping",
                    config.ore_block_id
                );
                continue;
            };
            let noise = NoiseSource::new(
                ctx.settings.frequency * config.frequency_multiplier,
                config.seed_for(ctx.settings.seed),
            );
            self.active.push(ActiveOre {
                config: config.clone(),
                ore,
                replace,
                noise,
            });
        }
        log::debug!("{} ore configs active", self.active.len());
    }

    fn apply_column(&mut self, store: &mut VoxelStore, ctx: &mut WorldGenContext, column: ChunkColumn) {
        let min_y = ctx.settings.min_elevation;
        for (x, z) in column.block_columns() {
            let surface = ctx.height(x, z);
            for active in &self.active {
                let low = min_y.max(active.config.min_elevation);
                for y in low..surface {
                    if !active.config.in_band(y, surface) {
                        continue;
                    }
                    let pos = IVec3::new(x, y, z);
                    if store.block_id(pos) != Some(active.replace) {
                        continue;
                    }
                    if active.noise.block(pos) > active.config.threshold {
                        store.set_block(pos, active.ore);
                    }
                }
            }
        }
    }
}
