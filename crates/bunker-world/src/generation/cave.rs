use bunker_core::constants::seed_offsets;
use bunker_core::types::BlockId;
use glam::IVec3;

use super::context::{ChunkColumn, WorldGenContext};
use super::pipeline::GenerationStep;
use crate::noise_source::{self, NoiseSource};
use crate::store::VoxelStore;

/// Carves air wherever the 3D cave noise is above the cave threshold,
/// keeping a solid floor above the bottom slice and a solid roof under the
/// surface.
#[derive(Debug, Default)]
pub struct CaveStep {
    noise: Option<NoiseSource>,
}

impl CaveStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Y range eligible for carving in a column whose height is `surface`.
    pub fn carve_range(ctx: &WorldGenContext, surface: i32) -> std::ops::Range<i32> {
        let caves = &ctx.settings.caves;
        let low = ctx.settings.min_elevation + caves.floor_margin + 1;
        let high = surface - caves.surface_margin;
        low..high.max(low)
    }
}

impl GenerationStep for CaveStep {
    fn name(&self) -> &'static str {
        "cave"
    }

    fn begin(&mut self, _store: &VoxelStore, ctx: &mut WorldGenContext) {
        let settings = &ctx.settings;
        self.noise = settings.caves.enabled.then(|| {
            noise_source::create(
                settings.frequency * settings.caves.frequency_multiplier,
                settings.seed,
                seed_offsets::CAVE,
            )
        });
    }

    fn apply_column(&mut self, store: &mut VoxelStore, ctx: &mut WorldGenContext, column: ChunkColumn) {
        let Some(noise) = &self.noise else {
            return;
        };
        let threshold = ctx.settings.caves.threshold;
        for (x, z) in column.block_columns() {
            for y in Self::carve_range(ctx, ctx.height(x, z)) {
                let pos = IVec3::new(x, y, z);
                if noise.block(pos) > threshold {
                    store.set_block(pos, BlockId::AIR);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::height_map::HeightMapStep;
    use crate::generation::test_support::{context, registry};
    use crate::settings::WorldGenSettings;

    fn generate(threshold: f64) -> (VoxelStore, VoxelStore, WorldGenContext) {
        let mut settings = WorldGenSettings::with_dims(32, 24, 32, -24);
        settings.caves.threshold = threshold;
        let (mut store, mut ctx) = context(settings, registry());
        HeightMapStep::new().apply(&mut store, &mut ctx);
        let before = store.clone();
        CaveStep::new().apply(&mut store, &mut ctx);
        (before, store, ctx)
    }

    #[test]
    fn test_carving_stays_in_range() {
        let (before, after, ctx) = generate(0.3);
        let mut carved = 0;
        for x in 0..32 {
            for z in 0..32 {
                let range = CaveStep::carve_range(&ctx, ctx.height(x, z));
                for y in -24..24 {
                    let pos = IVec3::new(x, y, z);
                    if before.is_solid(pos) && !after.is_solid(pos) {
                        carved += 1;
                        assert!(range.contains(&y), "{:?} outside {:?}", pos, range);
                        assert!(y > -24 + 5);
                        assert!(y < ctx.height(x, z) - 5);
                    }
                }
            }
        }
        assert!(carved > 0, "a low threshold should carve something");
    }

    #[test]
    fn test_threshold_above_noise_range_carves_nothing() {
        let (before, after, _) = generate(2.0);
        assert_eq!(before.fingerprint(), after.fingerprint());
    }

    #[test]
    fn test_disabled_caves_carve_nothing() {
        let mut settings = WorldGenSettings::with_dims(16, 16, 16, -16);
        settings.caves.enabled = false;
        settings.caves.threshold = -2.0;
        let (mut store, mut ctx) = context(settings, registry());
        HeightMapStep::new().apply(&mut store, &mut ctx);
        let before = store.fingerprint();
        CaveStep::new().apply(&mut store, &mut ctx);
        assert_eq!(store.fingerprint(), before);
    }

    #[test]
    fn test_carve_range_empty_for_shallow_columns() {
        let (_, _, ctx) = generate(0.6);
        assert!(CaveStep::carve_range(&ctx, -20).is_empty());
        assert_eq!(CaveStep::carve_range(&ctx, 10), -18..5);
    }
}
