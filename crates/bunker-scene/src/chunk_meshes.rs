use std::collections::HashMap;
use std::sync::Arc;

use bunker_core::types::ChunkKey;
use bunker_mesh::MeshBuffers;

/// Which raycast layer a chunk's collider sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaycastLayer {
    /// Hit by picking rays.
    Default,
    /// Skipped by picking rays. Used for slices above the cutaway.
    IgnoreRaycast,
}

/// Per-chunk render and collision state handed to the host.
#[derive(Debug, Clone)]
pub struct ChunkRenderState {
    /// Shared by the renderer and the collider.
    pub mesh: Arc<MeshBuffers>,
    pub renderer_enabled: bool,
    pub collider_enabled: bool,
    pub layer: RaycastLayer,
    /// Whether the mesh was built with forced top faces.
    pub force_top: bool,
    /// Number of times the mesh was replaced after the first build.
    pub rebuilds: u32,
}

impl ChunkRenderState {
    fn new(mesh: MeshBuffers, force_top: bool) -> Self {
        Self {
            mesh: Arc::new(mesh),
            renderer_enabled: true,
            collider_enabled: true,
            layer: RaycastLayer::Default,
            force_top,
            rebuilds: 0,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.renderer_enabled = visible;
        self.collider_enabled = visible;
        self.layer = if visible {
            RaycastLayer::Default
        } else {
            RaycastLayer::IgnoreRaycast
        };
    }

    pub fn is_visible(&self) -> bool {
        self.renderer_enabled
    }
}

/// Every chunk's current mesh, keyed by chunk.
#[derive(Debug, Clone, Default)]
pub struct ChunkMeshCache {
    states: HashMap<ChunkKey, ChunkRenderState>,
}

impl ChunkMeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: HashMap::with_capacity(capacity),
        }
    }

    /// Store a freshly built mesh. An existing entry keeps its visibility
    /// flags and counts a rebuild.
    pub fn insert(&mut self, key: ChunkKey, mesh: MeshBuffers, force_top: bool) {
        match self.states.get_mut(&key) {
            Some(state) => {
                state.mesh = Arc::new(mesh);
                state.force_top = force_top;
                state.rebuilds += 1;
            }
            None => {
                self.states.insert(key, ChunkRenderState::new(mesh, force_top));
            }
        }
    }

    pub fn get(&self, key: ChunkKey) -> Option<&ChunkRenderState> {
        self.states.get(&key)
    }

    pub fn get_mut(&mut self, key: ChunkKey) -> Option<&mut ChunkRenderState> {
        self.states.get_mut(&key)
    }

    pub fn mesh(&self, key: ChunkKey) -> Option<Arc<MeshBuffers>> {
        self.states.get(&key).map(|s| Arc::clone(&s.mesh))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkKey, &ChunkRenderState)> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Show chunks at or below `elevation`, hide the rest.
    pub fn apply_cutaway(&mut self, elevation: i32) {
        for (key, state) in self.states.iter_mut() {
            state.set_visible(key.y <= elevation);
        }
    }

    /// Get counts: (total, visible, hidden)
    pub fn chunk_counts(&self) -> (usize, usize, usize) {
        let visible = self.states.values().filter(|s| s.is_visible()).count();
        (self.states.len(), visible, self.states.len() - visible)
    }

    /// Triangles across all visible chunks.
    pub fn visible_triangles(&self) -> usize {
        self.states
            .values()
            .filter(|s| s.is_visible())
            .map(|s| s.mesh.triangle_count())
            .sum()
    }

    pub fn total_triangles(&self) -> usize {
        self.states.values().map(|s| s.mesh.triangle_count()).sum()
    }
}
