use bunker_core::constants::seed_offsets;
use glam::IVec3;

use super::context::{ChunkColumn, WorldGenContext};
use super::hedge::generate_hedges;
use super::pipeline::GenerationStep;
use crate::noise_source::{self, NoiseSource};
use crate::rng::rng_at;
use crate::store::VoxelStore;

/// Why a tree was not placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeRejection {
    NearEdge,
    NearOtherTree,
    OutOfBounds,
}

/// Whether `base` lies within `radius` of the world's X/Z edge.
pub fn near_world_edge(ctx: &WorldGenContext, base: IVec3, radius: i32) -> bool {
    let max_x = ctx.settings.max_x as i32;
    let max_z = ctx.settings.max_z as i32;
    base.x < radius || base.x > max_x - radius || base.z < radius || base.z > max_z - radius
}

/// Whether any log block lies inside the cube of `radius` around `center`.
pub fn log_nearby(store: &VoxelStore, ctx: &WorldGenContext, center: IVec3, radius: i32) -> bool {
    let log = ctx.blocks.log;
    for x in center.x - radius..=center.x + radius {
        for z in center.z - radius..=center.z + radius {
            for y in center.y - radius..=center.y + radius {
                if store.block_id(IVec3::new(x, y, z)) == Some(log) {
                    return true;
                }
            }
        }
    }
    false
}

/// Grow a tree with its trunk starting at `base` and record it in the
/// context's tree list. Returns the new tree's id.
///
/// The trunk height comes from an RNG seeded by the base position, so the
/// same base always grows the same tree.
pub fn generate_tree(store: &mut VoxelStore, ctx: &mut WorldGenContext, base: IVec3) -> Result<u32, TreeRejection> {
    let veg = &ctx.settings.vegetation;
    let radius = veg.tree_radius;

    if near_world_edge(ctx, base, radius) {
        return Err(TreeRejection::NearEdge);
    }
    if log_nearby(store, ctx, base, radius) {
        return Err(TreeRejection::NearOtherTree);
    }
    if !store.in_bounds(base) {
        return Err(TreeRejection::OutOfBounds);
    }

    let mut rng = rng_at(base, ctx.settings.seed.wrapping_add(seed_offsets::VEGETATION));
    let trunk_top = base.y + rng.i32(veg.min_trunk_height..veg.max_trunk_height);
    let (log, leaves) = (ctx.blocks.log, ctx.blocks.leaves);

    let mut logs = Vec::new();
    for y in base.y..trunk_top {
        let pos = IVec3::new(base.x, y, base.z);
        if store.set_block(pos, log) {
            logs.push(pos);
        }
    }

    let r = veg.leaf_radius;
    let mut leaf_cells = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            for dz in -r..=r {
                if dx.abs() + dy.abs() + dz.abs() > veg.leaf_manhattan {
                    continue;
                }
                let pos = IVec3::new(base.x + dx, trunk_top + dy, base.z + dz);
                match store.block_id(pos) {
                    Some(id) if id == log => continue,
                    None => continue,
                    Some(_) => {}
                }
                if store.set_block(pos, leaves) {
                    leaf_cells.push(pos);
                }
            }
        }
    }

    let id = ctx.trees.add(base, logs, leaf_cells);
    log::debug!("Tree {} grown at {}", id, base);
    Ok(id)
}

/// Turns eligible surface blocks to dirt, grows trees on the sparser subset
/// of those, then lays hedges once every column is done.
#[derive(Debug, Default)]
pub struct VegetationStep {
    eligibility: Option<NoiseSource>,
    density: Option<NoiseSource>,
    trees_grown: usize,
    trees_rejected: usize,
}

impl VegetationStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trees_grown(&self) -> usize {
        self.trees_grown
    }

    pub fn trees_rejected(&self) -> usize {
        self.trees_rejected
    }
}

impl GenerationStep for VegetationStep {
    fn name(&self) -> &'static str {
        "vegetation"
    }

    fn begin(&mut self, _store: &VoxelStore, ctx: &mut WorldGenContext) {
        let settings = &ctx.settings;
        let veg = &settings.vegetation;
        self.trees_grown = 0;
        self.trees_rejected = 0;
        if !veg.enabled {
            self.eligibility = None;
            self.density = None;
            return;
        }
        self.eligibility = Some(noise_source::create(
            settings.frequency * veg.eligibility_frequency_multiplier,
            settings.seed,
            seed_offsets::VEGETATION,
        ));
        self.density = Some(noise_source::create(
            settings.frequency * veg.tree_frequency_multiplier,
            settings.seed,
            seed_offsets::TREE_DENSITY,
        ));
    }

    fn apply_column(&mut self, store: &mut VoxelStore, ctx: &mut WorldGenContext, column: ChunkColumn) {
        let (Some(eligibility), Some(density)) = (&self.eligibility, &self.density) else {
            return;
        };
        let veg = ctx.settings.vegetation.clone();
        let dirt = ctx.blocks.dirt;

        for (x, z) in column.block_columns() {
            let height = ctx.height(x, z);
            let base = IVec3::new(x, height, z);
            if eligibility.block(base) <= veg.eligibility_threshold {
                continue;
            }
            store.set_block(IVec3::new(x, height - 1, z), dirt);

            if density.block(base) > veg.tree_threshold {
                match generate_tree(store, ctx, base) {
                    Ok(_) => self.trees_grown += 1,
                    Err(reason) => {
                        self.trees_rejected += 1;
                        log::debug!("Tree at {} rejected: {:?}", base, reason);
                    }
                }
            }
        }
    }

    fn finish(&mut self, store: &mut VoxelStore, ctx: &mut WorldGenContext) {
        log::info!(
            "Vegetation placed {} trees ({} rejected)",
            self.trees_grown,
            self.trees_rejected
        );
        generate_hedges(store, ctx);
    }
}
