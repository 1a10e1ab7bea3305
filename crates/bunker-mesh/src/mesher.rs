use bunker_blocks::{BlockRegistry, TextureAtlas};
use bunker_core::face::{Face, ALL_FACES};
use bunker_core::types::{BlockId, ChunkKey};
use glam::{IVec3, Vec3};
use rayon::prelude::*;

use bunker_world::{Chunk, VoxelStore};

use crate::buffers::MeshBuffers;
use crate::uv_table::BlockUvTable;

/// Builds per-chunk meshes with hidden-face culling.
///
/// Neighbours are looked up through the store in world coordinates, so
/// faces between chunks and between slices are culled the same way as
/// faces inside a chunk. Cells outside the world count as empty.
#[derive(Debug, Clone)]
pub struct ChunkMesher {
    uvs: BlockUvTable,
}

impl ChunkMesher {
    pub fn new(registry: &BlockRegistry, atlas: &TextureAtlas) -> Self {
        Self {
            uvs: BlockUvTable::build(registry, atlas),
        }
    }

    pub fn uv_table(&self) -> &BlockUvTable {
        &self.uvs
    }

    /// Whether `face` of the solid block at `pos` is drawn.
    pub fn face_visible(store: &VoxelStore, pos: IVec3, face: Face, force_top: bool) -> bool {
        if force_top && face == Face::Up {
            return true;
        }
        !store.is_solid(pos + face.offset())
    }

    /// Mesh one chunk. Vertices are relative to the chunk's X/Z origin and
    /// keep their world Y.
    ///
    /// With `force_top`, every solid block emits its top face whatever lies
    /// above it, capping the cutaway layer.
    pub fn build(&self, chunk: &Chunk, store: &VoxelStore, force_top: bool) -> MeshBuffers {
        let origin = chunk.origin();
        let mut mesh = MeshBuffers::with_face_capacity(chunk.solid_count());

        for block in chunk.blocks().iter().filter(|b| b.is_solid()) {
            let pos = block.position();
            let center = Vec3::new((pos.x - origin.x) as f32, pos.y as f32, (pos.z - origin.z) as f32);
            for face in ALL_FACES {
                if Self::face_visible(store, pos, face, force_top) {
                    mesh.push_face(center, face, self.uvs.for_face(block.block(), face));
                }
            }
        }

        mesh
    }

    pub fn build_key(&self, key: ChunkKey, store: &VoxelStore, force_top: bool) -> Option<MeshBuffers> {
        store.chunk(key).map(|chunk| self.build(chunk, store, force_top))
    }

    /// Mesh every chunk of one slice in parallel. Empty for a missing slice.
    pub fn build_slice(&self, store: &VoxelStore, y: i32, force_top: bool) -> Vec<(ChunkKey, MeshBuffers)> {
        let Some(slice) = store.slice(y) else {
            return Vec::new();
        };
        slice
            .chunks()
            .par_iter()
            .map(|chunk| (chunk.key(), self.build(chunk, store, force_top)))
            .collect()
    }

    /// Mesh the whole store, slice by slice. The slice at `force_top_y`, if
    /// any, is built with forced top faces.
    pub fn build_all(&self, store: &VoxelStore, force_top_y: Option<i32>) -> Vec<(ChunkKey, MeshBuffers)> {
        let meshes: Vec<(ChunkKey, MeshBuffers)> = store
            .slices()
            .flat_map(|slice| slice.chunks().iter())
            .collect::<Vec<_>>()
            .par_iter()
            .map(|chunk| {
                let force_top = force_top_y == Some(chunk.key().y);
                (chunk.key(), self.build(chunk, store, force_top))
            })
            .collect();
        log::info!(
            "Meshed {} chunks ({} faces)",
            meshes.len(),
            meshes.iter().map(|(_, m)| m.face_count()).sum::<usize>()
        );
        meshes
    }

    /// Mesh a loose set of blocks with every face drawn, relative to `origin`.
    pub fn build_loose(&self, blocks: &[(IVec3, BlockId)], origin: IVec3) -> MeshBuffers {
        let mut mesh = MeshBuffers::with_face_capacity(blocks.len() * 6);
        for &(pos, block) in blocks {
            let center = (pos - origin).as_vec3();
            for face in ALL_FACES {
                mesh.push_face(center, face, self.uvs.for_face(block, face));
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use bunker_core::block::{BlockDefinition, TextureSet};
    use bunker_world::WorldDims;
    use image::{Rgba, RgbaImage};

    struct Fixture {
        registry: Arc<BlockRegistry>,
        atlas: TextureAtlas,
        store: VoxelStore,
    }

    fn fixture(dims: WorldDims) -> Fixture {
        let registry = Arc::new(BlockRegistry::from_definitions(vec![
            BlockDefinition::air(),
            BlockDefinition::new("bunker:stone_block").with_textures(TextureSet::uniform("stone")),
            BlockDefinition::new("bunker:grass_block").with_textures(TextureSet {
                top: "grass_top".into(),
                bottom: "dirt".into(),
                side: "grass_side".into(),
            }),
        ]));
        let textures: BTreeMap<String, RgbaImage> = ["dirt", "grass_side", "grass_top", "stone"]
            .into_iter()
            .enumerate()
            .map(|(i, n)| (n.to_string(), RgbaImage::from_pixel(8, 8, Rgba([i as u8 * 60, 0, 0, 255]))))
            .collect();
        let atlas = TextureAtlas::build(&textures, 2).expect("atlas");
        let store = VoxelStore::initialise(dims, Arc::clone(&registry));
        Fixture {
            registry,
            atlas,
            store,
        }
    }

    fn brute_force_faces(store: &VoxelStore, chunk: &Chunk) -> usize {
        let mut count = 0;
        for block in chunk.blocks().iter().filter(|b| b.is_solid()) {
            for face in ALL_FACES {
                let neighbour = block.position() + face.offset();
                let visible = match store.get_block(neighbour) {
                    None => true,
                    Some(b) => !b.is_solid(),
                };
                if visible {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_single_block_has_six_faces() {
        let mut f = fixture(WorldDims::new(16, 4, 16, 0));
        let stone = f.registry.numeric_of("bunker:stone_block");
        f.store.set_block(IVec3::new(3, 1, 4), stone);
        let mesher = ChunkMesher::new(&f.registry, &f.atlas);
        let chunk = f.store.chunk(ChunkKey::new(0, 0, 1)).expect("chunk");
        let mesh = mesher.build(chunk, &f.store, false);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.bounds.min, Vec3::new(2.5, 0.5, 3.5));
    }

    #[test]
    fn test_adjacent_blocks_share_no_faces() {
        let mut f = fixture(WorldDims::new(16, 4, 16, 0));
        let stone = f.registry.numeric_of("bunker:stone_block");
        f.store.set_block(IVec3::new(3, 1, 4), stone);
        f.store.set_block(IVec3::new(4, 1, 4), stone);
        let mesher = ChunkMesher::new(&f.registry, &f.atlas);
        let chunk = f.store.chunk(ChunkKey::new(0, 0, 1)).expect("chunk");
        assert_eq!(mesher.build(chunk, &f.store, false).face_count(), 10);
    }

    #[test]
    fn test_culling_matches_brute_force() {
        let mut f = fixture(WorldDims::new(32, 6, 32, -2));
        let stone = f.registry.numeric_of("bunker:stone_block");
        let grass = f.registry.numeric_of("bunker:grass_block");
        let mut rng = fastrand::Rng::with_seed(99);
        for x in 0..32 {
            for z in 0..32 {
                for y in -2..4 {
                    let roll = rng.u8(..);
                    let id = match roll % 3 {
                        0 => stone,
                        1 => grass,
                        _ => BlockId::AIR,
                    };
                    f.store.set_block(IVec3::new(x, y, z), id);
                }
            }
        }
        let mesher = ChunkMesher::new(&f.registry, &f.atlas);
        let mut total = 0;
        for key in f.store.chunk_keys().collect::<Vec<_>>() {
            let chunk = f.store.chunk(key).expect("chunk");
            let mesh = mesher.build(chunk, &f.store, false);
            let expected = brute_force_faces(&f.store, chunk);
            assert_eq!(mesh.face_count(), expected, "{}", key);
            total += expected;
        }
        let all: usize = mesher.build_all(&f.store, None).iter().map(|(_, m)| m.face_count()).sum();
        assert_eq!(all, total);
    }

    #[test]
    fn test_chunk_boundary_is_seamless() {
        let mut f = fixture(WorldDims::new(32, 2, 16, 0));
        let stone = f.registry.numeric_of("bunker:stone_block");
        f.store.set_block(IVec3::new(15, 0, 5), stone);
        f.store.set_block(IVec3::new(16, 0, 5), stone);
        let mesher = ChunkMesher::new(&f.registry, &f.atlas);
        let left = mesher
            .build_key(ChunkKey::new(0, 0, 0), &f.store, false)
            .expect("chunk");
        let right = mesher
            .build_key(ChunkKey::new(1, 0, 0), &f.store, false)
            .expect("chunk");
        assert_eq!(left.face_count(), 5);
        assert_eq!(right.face_count(), 5);
        // Right chunk vertices are local to its own origin.
        assert_eq!(right.bounds.min.x, -0.5);
    }

    #[test]
    fn test_force_top_emits_covered_tops() {
        let mut f = fixture(WorldDims::new(16, 4, 16, 0));
        let stone = f.registry.numeric_of("bunker:stone_block");
        for y in 0..3 {
            f.store.set_block(IVec3::new(8, y, 8), stone);
        }
        let mesher = ChunkMesher::new(&f.registry, &f.atlas);
        let chunk = f.store.chunk(ChunkKey::new(0, 0, 1)).expect("chunk");
        let normal = mesher.build(chunk, &f.store, false);
        let forced = mesher.build(chunk, &f.store, true);
        assert_eq!(normal.face_count(), 4);
        assert_eq!(forced.face_count(), 5);
    }

    #[test]
    fn test_face_uvs_follow_texture_slots() {
        let mut f = fixture(WorldDims::new(16, 2, 16, 0));
        let grass = f.registry.numeric_of("bunker:grass_block");
        f.store.set_block(IVec3::new(1, 0, 1), grass);
        let mesher = ChunkMesher::new(&f.registry, &f.atlas);
        let chunk = f.store.chunk(ChunkKey::new(0, 0, 0)).expect("chunk");
        let mesh = mesher.build(chunk, &f.store, false);
        // Faces are emitted in ALL_FACES order: Up, Down, then the sides.
        assert_eq!(&mesh.uvs[0..4], &f.atlas.uv("grass_top").corners());
        assert_eq!(&mesh.uvs[4..8], &f.atlas.uv("dirt").corners());
        for face in 2..6 {
            assert_eq!(&mesh.uvs[face * 4..face * 4 + 4], &f.atlas.uv("grass_side").corners());
        }
    }

    #[test]
    fn test_recomputed_normals_point_outward() {
        let mut f = fixture(WorldDims::new(16, 2, 16, 0));
        let stone = f.registry.numeric_of("bunker:stone_block");
        f.store.set_block(IVec3::new(5, 0, 5), stone);
        let mesher = ChunkMesher::new(&f.registry, &f.atlas);
        let chunk = f.store.chunk(ChunkKey::new(0, 0, 0)).expect("chunk");
        let mesh = mesher.build(chunk, &f.store, false);
        let normals = mesh.compute_normals();
        let center = Vec3::new(5.0, 0.0, 5.0);
        for (v, n) in mesh.vertices.iter().zip(normals) {
            let outward = Vec3::from(*v) - center;
            assert!(outward.dot(Vec3::from(n)) > 0.0);
        }
    }

    #[test]
    fn test_loose_mesh_draws_every_face() {
        let f = fixture(WorldDims::new(16, 2, 16, 0));
        let stone = f.registry.numeric_of("bunker:stone_block");
        let mesher = ChunkMesher::new(&f.registry, &f.atlas);
        let blocks = [(IVec3::new(4, 10, 4), stone), (IVec3::new(4, 11, 4), stone)];
        let mesh = mesher.build_loose(&blocks, IVec3::new(4, 10, 4));
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(mesh.bounds.min, Vec3::new(-0.5, -0.5, -0.5));
        assert_eq!(mesh.bounds.max, Vec3::new(0.5, 1.5, 0.5));
    }
}
