//! Unit-cube face geometry.
//!
//! Each face lists its four corners relative to the block centre, ordered so
//! that the triangles in [`QUAD_TRIANGLES`] wind counter-clockwise when seen
//! from outside the block.

use bunker_core::face::Face;

/// Two triangles per quad, as indices into a face's four vertices.
pub const QUAD_TRIANGLES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Corner offsets per face, indexed by `Face as usize`.
pub const FACE_VERTICES: [[[f32; 3]; 4]; 6] = [
    // Up
    [[-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5]],
    // Down
    [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5]],
    // North (+Z)
    [[0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, -0.5, 0.5]],
    // South (-Z)
    [[-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5], [0.5, -0.5, -0.5]],
    // East (+X)
    [[0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5], [0.5, -0.5, 0.5]],
    // West (-X)
    [[-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5], [-0.5, -0.5, -0.5]],
];

pub fn face_vertices(face: Face) -> &'static [[f32; 3]; 4] {
    &FACE_VERTICES[face as usize]
}
