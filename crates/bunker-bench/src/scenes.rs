use bunker_core::constants::CHUNK_SIZE;
use bunker_world::WorldGenSettings;

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: String,
    pub settings: WorldGenSettings,
    /// Random block edits timed after the world is built.
    pub edit_count: u32,
}

impl SceneConfig {
    pub fn new(name: &str, settings: WorldGenSettings) -> Self {
        Self {
            name: name.to_string(),
            settings,
            edit_count: 200,
        }
    }

    pub fn block_count(&self) -> u64 {
        let s = &self.settings;
        s.max_x as u64 * s.max_z as u64 * (s.max_y - s.min_elevation) as u64
    }
}

/// The standard suite, from a 64x64 map to a 256x256 one. Every scene
/// starts from `base` and only changes the footprint.
pub fn standard_scenes(base: &WorldGenSettings) -> Vec<SceneConfig> {
    [("64x64", 64), ("128x128", 128), ("256x256", 256)]
        .into_iter()
        .map(|(name, size)| {
            let settings = WorldGenSettings {
                max_x: size,
                max_z: size,
                ..base.clone()
            };
            SceneConfig::new(name, settings)
        })
        .collect()
}

/// Number of chunks a scene's world is split into.
pub fn scene_chunk_count(config: &SceneConfig) -> usize {
    let s = &config.settings;
    let per_slice = (s.max_x / CHUNK_SIZE) as usize * (s.max_z / CHUNK_SIZE) as usize;
    s.dims().slice_count() * per_slice
}
