use bunker_core::face::{Face, ALL_FACES};
use bunker_core::types::BlockId;
use bunker_world::VoxelStore;
use glam::{IVec3, Vec3};

/// First solid block along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub block_pos: IVec3,
    /// Last empty cell before the hit. Where a placed block goes.
    pub place_pos: IVec3,
    pub block: BlockId,
    pub distance: f32,
}

impl RayHit {
    /// Face of the hit block the ray entered through. `None` when the ray
    /// started inside the block.
    pub fn face(&self) -> Option<Face> {
        let d = self.place_pos - self.block_pos;
        ALL_FACES.into_iter().find(|f| f.offset() == d)
    }
}

/// Walk the voxel grid cell by cell from `origin` along `direction`.
///
/// Blocks are unit cubes centred on integer coordinates. Cells above
/// `cutaway` are treated as empty. Gives up after `max_dist`, which must be
/// finite; an infinite or NaN range never hits.
pub fn raycast(
    store: &VoxelStore,
    origin: Vec3,
    direction: Vec3,
    max_dist: f32,
    cutaway: Option<i32>,
) -> Option<RayHit> {
    if !max_dist.is_finite() {
        return None;
    }
    let dir = direction.try_normalize()?;
    // Shift so cell boundaries fall on integers.
    let start = origin + Vec3::splat(0.5);

    let mut cell = start.floor().as_ivec3();
    let step = IVec3::new(
        if dir.x > 0.0 { 1 } else { -1 },
        if dir.y > 0.0 { 1 } else { -1 },
        if dir.z > 0.0 { 1 } else { -1 },
    );
    // Axes the ray does not move along never reach a boundary.
    let inv = Vec3::new(
        if dir.x != 0.0 { 1.0 / dir.x.abs() } else { f32::INFINITY },
        if dir.y != 0.0 { 1.0 / dir.y.abs() } else { f32::INFINITY },
        if dir.z != 0.0 { 1.0 / dir.z.abs() } else { f32::INFINITY },
    );
    let boundary = |s: f32, c: i32, d: f32, inv: f32| {
        if d > 0.0 {
            (c as f32 + 1.0 - s) * inv
        } else if d < 0.0 {
            (s - c as f32) * inv
        } else {
            f32::INFINITY
        }
    };
    let mut t_max = Vec3::new(
        boundary(start.x, cell.x, dir.x, inv.x),
        boundary(start.y, cell.y, dir.y, inv.y),
        boundary(start.z, cell.z, dir.z, inv.z),
    );

    let mut previous = cell;
    let mut dist = 0.0;
    while dist <= max_dist {
        let hidden = cutaway.is_some_and(|top| cell.y > top);
        if !hidden && store.is_solid(cell) {
            let block = store.block_id(cell).unwrap_or(BlockId::AIR);
            return Some(RayHit {
                block_pos: cell,
                place_pos: previous,
                block,
                distance: dist,
            });
        }
        previous = cell;
        if t_max.x < t_max.y && t_max.x < t_max.z {
            dist = t_max.x;
            cell.x += step.x;
            t_max.x += inv.x;
        } else if t_max.y < t_max.z {
            dist = t_max.y;
            cell.y += step.y;
            t_max.y += inv.y;
        } else {
            dist = t_max.z;
            cell.z += step.z;
            t_max.z += inv.z;
        }
    }
    None
}
