//! Tree felling.
//!
//! Cutting a recorded log clears that log, every log above it and all of the
//! tree's leaves. The part above the cut comes back as a loose mesh so the
//! host can animate it falling.

use bunker_core::types::{BlockId, ChunkKey};
use bunker_mesh::MeshBuffers;
use glam::{IVec3, Vec3};

use crate::accessor::BlockAccessor;

/// Initial push for the falling part, applied by the host's physics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallImpulse {
    /// Horizontal unit vector the tree tips towards.
    pub direction: Vec3,
    pub push: f32,
    /// Applied around `Vec3::Y.cross(direction)`.
    pub torque: f32,
}

impl FallImpulse {
    fn roll(rng: &mut fastrand::Rng) -> Self {
        let mut direction = Vec3::ZERO;
        while direction.length_squared() < 1e-6 {
            direction = Vec3::new(rng.f32() * 2.0 - 1.0, 0.0, rng.f32() * 2.0 - 1.0);
        }
        Self {
            direction: direction.normalize(),
            push: 1.0 + rng.f32() * 2.0,
            torque: 2.0 + rng.f32() * 3.0,
        }
    }

    pub fn torque_axis(&self) -> Vec3 {
        Vec3::Y.cross(self.direction)
    }
}

/// The detached part of a felled tree.
#[derive(Debug, Clone)]
pub struct FallingTree {
    /// Lowest log above the cut. Mesh vertices are relative to it.
    pub origin: IVec3,
    pub blocks: Vec<(IVec3, BlockId)>,
    pub mesh: MeshBuffers,
    pub impulse: FallImpulse,
}

#[derive(Debug, Clone)]
pub struct FelledTree {
    pub tree_id: u32,
    pub hit: IVec3,
    pub removed_logs: Vec<IVec3>,
    pub removed_leaves: Vec<IVec3>,
    /// `None` when the cut was at the top log.
    pub falling: Option<FallingTree>,
    pub dirty: Vec<ChunkKey>,
    /// Whether the tree record was dropped because no logs were left.
    pub tree_removed: bool,
}

/// Fell the tree owning the log at `hit`. `None` if no recorded tree has a
/// log there.
pub fn fell_tree(accessor: &mut BlockAccessor<'_>, hit: IVec3, rng: &mut fastrand::Rng) -> Option<FelledTree> {
    let tree = accessor.trees.find_by_log(hit)?.clone();

    let mut logs_above: Vec<IVec3> = tree
        .logs
        .iter()
        .copied()
        .filter(|p| p.x == hit.x && p.z == hit.z && p.y > hit.y)
        .collect();
    logs_above.sort_by_key(|p| p.y);

    let falling = logs_above.first().map(|&origin| {
        let blocks: Vec<(IVec3, BlockId)> = logs_above
            .iter()
            .chain(tree.leaves.iter())
            .filter_map(|&p| {
                accessor
                    .store
                    .block_id(p)
                    .filter(|id| !id.is_air())
                    .map(|id| (p, id))
            })
            .collect();
        let mesh = accessor.mesher.build_loose(&blocks, origin);
        FallingTree {
            origin,
            blocks,
            mesh,
            impulse: FallImpulse::roll(rng),
        }
    });

    let removed_logs: Vec<IVec3> = tree.logs.iter().copied().filter(|p| p.y >= hit.y).collect();
    let removed_leaves: Vec<IVec3> = tree
        .leaves
        .iter()
        .copied()
        .filter(|&p| accessor.store.block_id(p).is_some_and(|id| !id.is_air()))
        .collect();

    let edits: Vec<(IVec3, BlockId)> = removed_logs
        .iter()
        .chain(removed_leaves.iter())
        .map(|&p| (p, BlockId::AIR))
        .collect();
    let dirty = accessor.set_many(&edits);

    for &pos in &removed_logs {
        accessor.trees.remove_log(pos);
    }
    if let Some(record) = accessor.trees.get_mut(tree.id) {
        record.leaves.clear();
    }
    let tree_removed = accessor.trees.get(tree.id).is_none();

    Some(FelledTree {
        tree_id: tree.id,
        hit,
        removed_logs,
        removed_leaves,
        falling,
        dirty,
        tree_removed,
    })
}
