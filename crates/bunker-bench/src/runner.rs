use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use bunker_blocks::{BlockRegistry, TextureAtlas};
use bunker_core::ore::OreConfig;
use bunker_core::types::BlockId;
use bunker_scene::{BuildError, BuildPhase, GameWorld, WorldBuilder};
use bunker_world::generate;
use glam::IVec3;

use crate::scenes::{scene_chunk_count, SceneConfig};

/// Timing statistics over repeated runs, in milliseconds.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Per-phase timings of one scene.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PhaseTimings {
    pub generation: TimingSeries,
    pub meshing: TimingSeries,
    pub total: TimingSeries,
    /// One sample per edit, including its remesh.
    pub edit: TimingSeries,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub dimensions: [i32; 4],
    pub seed: u32,
    pub runs: u32,
    pub chunk_count: usize,
    pub tree_count: usize,
    pub triangle_count: usize,
    pub block_counts: BTreeMap<String, usize>,
    /// Hex digest of the voxel grid. Equal across runs of one scene.
    pub fingerprint: String,
    pub timings: PhaseTimings,
}

/// Generates and meshes worlds on the CPU and times each phase.
pub struct BenchmarkRunner {
    registry: Arc<BlockRegistry>,
    ores: Vec<OreConfig>,
    atlas: Arc<TextureAtlas>,
    runs: u32,
    /// Columns per builder call. `None` builds each world in one call.
    batch: Option<usize>,
}

impl BenchmarkRunner {
    pub fn new(
        registry: Arc<BlockRegistry>,
        ores: Vec<OreConfig>,
        atlas: Arc<TextureAtlas>,
        runs: u32,
        batch: Option<usize>,
    ) -> Self {
        Self {
            registry,
            ores,
            atlas,
            runs: runs.max(1),
            batch,
        }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> Result<BenchmarkResult, BuildError> {
        log::info!(
            "Running scene '{}' ({} blocks, {} chunks)...",
            config.name,
            config.block_count(),
            scene_chunk_count(config)
        );

        let mut generation_times = Vec::with_capacity(self.runs as usize);
        let mut meshing_times = Vec::with_capacity(self.runs as usize);
        let mut total_times = Vec::with_capacity(self.runs as usize);
        let mut record = |run: u32, generation_ms: f64, meshing_ms: f64| {
            log::debug!("  run {}: generation {:.2}ms, meshing {:.2}ms", run, generation_ms, meshing_ms);
            generation_times.push(generation_ms);
            meshing_times.push(meshing_ms);
            total_times.push(generation_ms + meshing_ms);
        };

        let (mut world, generation_ms, meshing_ms) = self.build(config)?;
        record(0, generation_ms, meshing_ms);
        for run in 1..self.runs {
            let (next, generation_ms, meshing_ms) = self.build(config)?;
            record(run, generation_ms, meshing_ms);
            world = next;
        }

        let edit_times = time_edits(&mut world, config.edit_count, config.settings.seed as u64);

        let registry = world.store().registry();
        let block_counts = world
            .store()
            .histogram()
            .into_iter()
            .enumerate()
            .filter(|(_, count)| *count > 0)
            .map(|(id, count)| (registry.string_of(BlockId(id as u16)).to_string(), count))
            .collect();

        let timings = PhaseTimings {
            generation: compute_timings(&generation_times),
            meshing: compute_timings(&meshing_times),
            total: compute_timings(&total_times),
            edit: compute_timings(&edit_times),
        };
        log::info!(
            "  Done: generation={:.2}ms, meshing={:.2}ms, edit p95={:.3}ms",
            timings.generation.mean_ms,
            timings.meshing.mean_ms,
            timings.edit.p95_ms
        );

        let s = &config.settings;
        Ok(BenchmarkResult {
            scene_name: config.name.clone(),
            dimensions: [s.max_x as i32, s.max_y, s.max_z as i32, s.min_elevation],
            seed: s.seed,
            runs: self.runs,
            chunk_count: world.meshes().len(),
            tree_count: world.trees().len(),
            triangle_count: world.meshes().total_triangles(),
            block_counts,
            fingerprint: format!("{:016x}", world.store().fingerprint()),
            timings,
        })
    }

    fn build(&self, config: &SceneConfig) -> Result<(GameWorld, f64, f64), BuildError> {
        match self.batch {
            Some(batch) => self.build_batched(config, batch),
            None => self.build_one_shot(config),
        }
    }

    fn build_one_shot(&self, config: &SceneConfig) -> Result<(GameWorld, f64, f64), BuildError> {
        let start = Instant::now();
        let generated = generate(config.settings.clone(), Arc::clone(&self.registry), self.ores.clone())?;
        let generation_ms = elapsed_ms(start);

        let start = Instant::now();
        let world = GameWorld::from_generated(generated, Arc::clone(&self.atlas));
        Ok((world, generation_ms, elapsed_ms(start)))
    }

    fn build_batched(&self, config: &SceneConfig, batch: usize) -> Result<(GameWorld, f64, f64), BuildError> {
        let mut builder = WorldBuilder::new(
            config.settings.clone(),
            Arc::clone(&self.registry),
            self.ores.clone(),
            Arc::clone(&self.atlas),
            batch,
        )?;
        let mut generation_ms = 0.0;
        let mut meshing_ms = 0.0;
        let mut calls = 0u32;
        while !builder.is_finished() {
            let phase = builder.progress().phase;
            let start = Instant::now();
            builder.generate_step();
            let ms = elapsed_ms(start);
            if phase == BuildPhase::Generating {
                generation_ms += ms;
            } else {
                meshing_ms += ms;
            }
            calls += 1;
        }
        log::debug!("  batched build took {} calls", calls);

        let start = Instant::now();
        let world = builder.finish();
        meshing_ms += elapsed_ms(start);
        Ok((world, generation_ms, meshing_ms))
    }
}

/// Mine or refill random surface blocks and time each edit with its remesh.
fn time_edits(world: &mut GameWorld, count: u32, seed: u64) -> Vec<f64> {
    let dims = world.store().dims();
    let stone = world.store().registry().numeric_of(bunker_core::constants::STONE_BLOCK_ID);
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut times = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let x = rng.i32(0..dims.max_x as i32);
        let z = rng.i32(0..dims.max_z as i32);
        let Some(surface) = world.store().surface_y(x, z) else {
            continue;
        };
        let start = Instant::now();
        if surface > dims.min_elevation && rng.bool() {
            let _ = world.mine(IVec3::new(x, surface - 1, z));
        } else {
            let _ = world.place(IVec3::new(x, surface, z), stone);
        }
        times.push(elapsed_ms(start));
    }
    times
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Compute timing statistics from a list of samples in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunker_blocks::loader::load_blocks_from_str;
    use bunker_world::WorldGenSettings;

    const BASE_BLOCKS: &str = include_str!("../../../data/blocks/base_blocks.ron");

    fn runner(batch: Option<usize>) -> BenchmarkRunner {
        let defs = load_blocks_from_str(BASE_BLOCKS).expect("base blocks parse");
        BenchmarkRunner::new(
            Arc::new(BlockRegistry::from_definitions(defs)),
            Vec::new(),
            Arc::new(TextureAtlas::empty()),
            2,
            batch,
        )
    }

    #[test]
    fn test_compute_timings() {
        let t = compute_timings(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(t.mean_ms, 2.5);
        assert_eq!(t.median_ms, 2.5);
        assert_eq!(t.min_ms, 1.0);
        assert_eq!(t.max_ms, 4.0);
        assert_eq!(t.p95_ms, 4.0);
        assert_eq!(compute_timings(&[]).mean_ms, 0.0);
    }

    #[test]
    fn test_one_shot_and_batched_agree() {
        let mut scene = SceneConfig::new("tiny", WorldGenSettings::with_dims(32, 16, 32, -8));
        scene.edit_count = 10;
        let one_shot = runner(None).run_scene(&scene).expect("one-shot");
        let batched = runner(Some(3)).run_scene(&scene).expect("batched");
        assert_eq!(one_shot.chunk_count, 4 * 24);
        assert_eq!(one_shot.block_counts, batched.block_counts);
        assert_eq!(one_shot.tree_count, batched.tree_count);
        assert!(one_shot.block_counts.contains_key("bunker:stone_block"));
        assert!(one_shot.timings.generation.mean_ms >= 0.0);
    }
}
