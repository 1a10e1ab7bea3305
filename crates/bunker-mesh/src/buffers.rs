use bunker_blocks::UvRect;
use bunker_core::face::Face;
use glam::Vec3;

use crate::faces::{face_vertices, QUAD_TRIANGLES};

/// Axis-aligned bounding box. Empty until a point is included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Vertex, index and UV buffers of one mesh. Four vertices and two
/// triangles per face. The same triangles serve rendering and collision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
    pub bounds: Aabb,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_face_capacity(faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(faces * 4),
            triangles: Vec::with_capacity(faces * 6),
            uvs: Vec::with_capacity(faces * 4),
            bounds: Aabb::EMPTY,
        }
    }

    /// Append one face of the unit block centred at `center`.
    pub fn push_face(&mut self, center: Vec3, face: Face, uv: UvRect) {
        let base = self.vertices.len() as u32;
        for (corner, tex) in face_vertices(face).iter().zip(uv.corners()) {
            let p = center + Vec3::from(*corner);
            self.bounds.include(p);
            self.vertices.push(p.to_array());
            self.uvs.push(tex);
        }
        self.triangles.extend(QUAD_TRIANGLES.iter().map(|i| base + i));
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Per-vertex normals accumulated from the triangles touching each vertex.
    pub fn compute_normals(&self) -> Vec<[f32; 3]> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.triangles.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
            let (pa, pb, pc) = (
                Vec3::from(self.vertices[a]),
                Vec3::from(self.vertices[b]),
                Vec3::from(self.vertices[c]),
            );
            let n = (pb - pa).cross(pc - pa);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }
        normals
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect()
    }

    /// Append another mesh, offsetting its indices.
    pub fn append(&mut self, other: &MeshBuffers) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.uvs.extend_from_slice(&other.uvs);
        self.triangles.extend(other.triangles.iter().map(|i| base + i));
        if !other.bounds.is_empty() {
            self.bounds.include(other.bounds.min);
            self.bounds.include(other.bounds.max);
        }
    }
}
