//! Cooperative world building.
//!
//! Generation and meshing are split into small calls so an interactive host
//! can interleave them with its own frame loop, or hand the whole job to a
//! worker thread and poll a progress channel.

use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use bunker_blocks::{BlockRegistry, TextureAtlas};
use bunker_core::ore::OreConfig;
use bunker_core::types::ChunkKey;
use bunker_mesh::{ChunkMesher, MeshBuffers};
use bunker_world::generation::PipelineProgress;
use bunker_world::{WorldGenError, WorldGenSettings, WorldGenerator};
use thiserror::Error;

use crate::world::GameWorld;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Generation(#[from] WorldGenError),
    #[error("World build worker stopped without a result")]
    WorkerLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Generating,
    Meshing,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildProgress {
    pub phase: BuildPhase,
    pub generation: PipelineProgress,
    pub slices_meshed: usize,
    pub slice_count: usize,
}

impl BuildProgress {
    /// Generation and meshing weighted equally.
    pub fn fraction(&self) -> f32 {
        let meshed = if self.slice_count == 0 {
            1.0
        } else {
            self.slices_meshed as f32 / self.slice_count as f32
        };
        (self.generation.fraction() + meshed) * 0.5
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BuildPhase::Finished
    }
}

/// Builds a [`GameWorld`] a batch at a time.
///
/// Each [`WorldBuilder::generate_step`] advances the current generation step
/// by `batch` chunk columns. Once generation is done, each call meshes one
/// slice, with that slice's chunks meshed in parallel.
pub struct WorldBuilder {
    generator: WorldGenerator,
    atlas: Arc<TextureAtlas>,
    mesher: ChunkMesher,
    built: Vec<(ChunkKey, MeshBuffers)>,
    batch: usize,
    generation: PipelineProgress,
    next_slice: usize,
    slice_count: usize,
}

impl WorldBuilder {
    pub fn new(
        settings: WorldGenSettings,
        registry: Arc<BlockRegistry>,
        ores: Vec<OreConfig>,
        atlas: Arc<TextureAtlas>,
        batch: usize,
    ) -> Result<Self, BuildError> {
        let mesher = ChunkMesher::new(&registry, &atlas);
        let generator = WorldGenerator::new(settings, registry, ores)?;
        let generation = generator.progress();
        let slice_count = generator.store().slice_count();
        Ok(Self {
            generator,
            atlas,
            mesher,
            built: Vec::new(),
            batch: batch.max(1),
            generation,
            next_slice: 0,
            slice_count,
        })
    }

    pub fn progress(&self) -> BuildProgress {
        let phase = if !self.generator.is_finished() {
            BuildPhase::Generating
        } else if self.next_slice < self.slice_count {
            BuildPhase::Meshing
        } else {
            BuildPhase::Finished
        };
        BuildProgress {
            phase,
            generation: self.generation.clone(),
            slices_meshed: self.next_slice,
            slice_count: self.slice_count,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress().is_finished()
    }

    /// Do one batch of work.
    pub fn generate_step(&mut self) -> BuildProgress {
        if !self.generator.is_finished() {
            self.generation = self.generator.step(self.batch);
        } else if self.next_slice < self.slice_count {
            let store = self.generator.store();
            let dims = store.dims();
            let y = dims.min_elevation + self.next_slice as i32;
            let force_top = y == dims.max_elevation();
            let slice = self.mesher.build_slice(store, y, force_top);
            log::debug!("Meshed slice y={} ({} chunks)", y, slice.len());
            self.built.extend(slice);
            self.next_slice += 1;
        }
        self.progress()
    }

    /// Run the remaining work and hand over the world.
    pub fn finish(mut self) -> GameWorld {
        while !self.is_finished() {
            self.generate_step();
        }
        log::info!("World built: {} chunks meshed", self.built.len());
        GameWorld::from_parts(self.generator.finish(), self.atlas, self.mesher, self.built)
    }

    /// Run the whole build on a worker thread.
    pub fn spawn_background(mut self) -> BackgroundBuild {
        let (progress_tx, progress_rx) = channel();
        let handle = thread::spawn(move || {
            while !self.is_finished() {
                let progress = self.generate_step();
                let _ = progress_tx.send(progress);
            }
            self.finish()
        });
        BackgroundBuild {
            progress: progress_rx,
            handle,
            last: None,
        }
    }
}

/// Handle to a world being built on another thread.
pub struct BackgroundBuild {
    progress: Receiver<BuildProgress>,
    handle: JoinHandle<GameWorld>,
    last: Option<BuildProgress>,
}

impl BackgroundBuild {
    /// Drain pending progress reports and return the latest one seen.
    pub fn poll(&mut self) -> Option<&BuildProgress> {
        while let Ok(progress) = self.progress.try_recv() {
            self.last = Some(progress);
        }
        self.last.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the world is ready.
    pub fn join(self) -> Result<GameWorld, BuildError> {
        self.handle.join().map_err(|_| BuildError::WorkerLost)
    }
}

/// Generate and mesh in one call.
pub fn build_blocking(
    settings: WorldGenSettings,
    registry: Arc<BlockRegistry>,
    ores: Vec<OreConfig>,
    atlas: Arc<TextureAtlas>,
) -> Result<GameWorld, BuildError> {
    let generated = bunker_world::generate(settings, registry, ores)?;
    Ok(GameWorld::from_generated(generated, atlas))
}
