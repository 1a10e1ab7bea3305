use std::collections::HashSet;

use bunker_core::constants::seed_offsets;
use glam::IVec3;

use super::context::WorldGenContext;
use crate::store::VoxelStore;

/// One hedge walk, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HedgePath {
    pub cells: Vec<(i32, i32)>,
    pub blocks_placed: usize,
}

/// Lay `count` hedges as random self-avoiding walks over the surface.
///
/// Each visited column gets one or two layers of leaves on top of its
/// highest solid block. A walk ends at its length, at the world edge, or
/// when its next cell has already been visited.
pub fn generate_hedges(store: &mut VoxelStore, ctx: &WorldGenContext) -> Vec<HedgePath> {
    let hedges = &ctx.settings.hedges;
    if !hedges.enabled || hedges.count == 0 {
        return Vec::new();
    }

    let max_x = ctx.settings.max_x as i32;
    let max_z = ctx.settings.max_z as i32;
    let margin = hedges.edge_margin.max(0);
    if max_x <= 2 * margin || max_z <= 2 * margin {
        log::debug!("World too small for hedges with edge margin {}", margin);
        return Vec::new();
    }

    let leaves = ctx.blocks.leaves;
    let seed = ctx.settings.seed.wrapping_add(seed_offsets::HEDGE);
    let mut rng = fastrand::Rng::with_seed(seed as u64);
    let mut paths = Vec::with_capacity(hedges.count as usize);

    for _ in 0..hedges.count {
        let mut x = rng.i32(margin..max_x - margin);
        let mut z = rng.i32(margin..max_z - margin);
        let (mut dir_x, mut dir_z) = (rng.i32(-1..=1), rng.i32(-1..=1));
        if dir_x == 0 && dir_z == 0 {
            dir_x = 1;
        }
        let length = rng.u32(hedges.min_length..hedges.max_length);

        let mut visited = HashSet::new();
        let mut path = HedgePath {
            cells: Vec::new(),
            blocks_placed: 0,
        };

        for _ in 0..length {
            if !store.dims().contains_column(x, z) || !visited.insert((x, z)) {
                break;
            }
            path.cells.push((x, z));

            if let Some(surface) = store.surface_y(x, z) {
                let layers = rng.i32(1..=2);
                for h in 0..layers {
                    if store.set_block(IVec3::new(x, surface + h, z), leaves) {
                        path.blocks_placed += 1;
                    }
                }
            }

            if rng.f64() < hedges.turn_chance {
                let turn = rng.i32(-1..=1);
                if rng.bool() {
                    dir_x = (dir_x + turn).clamp(-1, 1);
                } else {
                    dir_z = (dir_z + turn).clamp(-1, 1);
                }
                if dir_x == 0 && dir_z == 0 {
                    dir_x = 1;
                }
            }
            x += dir_x;
            z += dir_z;
        }

        paths.push(path);
    }

    log::info!(
        "Placed {} hedges ({} leaf blocks)",
        paths.len(),
        paths.iter().map(|p| p.blocks_placed).sum::<usize>()
    );
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::height_map::HeightMapStep;
    use crate::generation::pipeline::GenerationStep;
    use crate::generation::test_support::{context, registry};
    use crate::settings::WorldGenSettings;

    fn world(settings: WorldGenSettings) -> (VoxelStore, WorldGenContext) {
        let (mut store, mut ctx) = context(settings, registry());
        HeightMapStep::new().apply(&mut store, &mut ctx);
        (store, ctx)
    }

    #[test]
    fn test_walks_are_self_avoiding_and_bounded() {
        let (mut store, ctx) = world(WorldGenSettings::with_dims(48, 32, 48, -8));
        let paths = generate_hedges(&mut store, &ctx);
        assert_eq!(paths.len(), 30);
        for path in &paths {
            let unique: HashSet<_> = path.cells.iter().collect();
            assert_eq!(unique.len(), path.cells.len());
            assert!(path.cells.len() < 40);
            for &(x, z) in &path.cells {
                assert!((0..48).contains(&x) && (0..48).contains(&z));
            }
            for pair in path.cells.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                assert!((a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1);
            }
        }
        assert!(paths.iter().any(|p| p.blocks_placed > 0));
    }

    #[test]
    fn test_hedges_place_leaves_on_surface() {
        let (mut store, ctx) = world(WorldGenSettings::with_dims(32, 32, 32, -8));
        let before = store.clone();
        let paths = generate_hedges(&mut store, &ctx);
        let leaves = ctx.blocks.leaves;
        for &(x, z) in paths.iter().flat_map(|p| p.cells.iter()) {
            let Some(surface) = before.surface_y(x, z) else {
                continue;
            };
            assert_eq!(store.block_id(IVec3::new(x, surface, z)), Some(leaves));
        }
    }

    #[test]
    fn test_hedges_deterministic() {
        let (mut a, ctx) = world(WorldGenSettings::with_dims(32, 32, 32, -8));
        let (mut b, _) = world(WorldGenSettings::with_dims(32, 32, 32, -8));
        assert_eq!(generate_hedges(&mut a, &ctx), generate_hedges(&mut b, &ctx));
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_disabled_or_tiny_world() {
        let mut settings = WorldGenSettings::with_dims(16, 16, 16, -4);
        settings.hedges.enabled = false;
        let (mut store, ctx) = world(settings);
        assert!(generate_hedges(&mut store, &ctx).is_empty());

        let mut settings = WorldGenSettings::with_dims(16, 16, 16, -4);
        settings.hedges.edge_margin = 8;
        let (mut store, ctx) = world(settings);
        assert!(generate_hedges(&mut store, &ctx).is_empty());
    }
}
