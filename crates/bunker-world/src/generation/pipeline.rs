use bunker_core::ore::OreConfig;

use super::cave::CaveStep;
use super::context::{ChunkColumn, WorldGenContext};
use super::height_map::HeightMapStep;
use super::ore::OreStep;
use super::vegetation::VegetationStep;
use crate::store::VoxelStore;

/// One pass of world generation.
///
/// Work is split into chunk columns so the pipeline can stop between any two
/// of them. `begin` runs before the first column and `finish` after the last.
pub trait GenerationStep: Send {
    fn name(&self) -> &'static str;

    fn begin(&mut self, _store: &VoxelStore, _ctx: &mut WorldGenContext) {}

    fn apply_column(&mut self, store: &mut VoxelStore, ctx: &mut WorldGenContext, column: ChunkColumn);

    fn finish(&mut self, _store: &mut VoxelStore, _ctx: &mut WorldGenContext) {}

    /// Run the whole step in one call.
    fn apply(&mut self, store: &mut VoxelStore, ctx: &mut WorldGenContext) {
        self.begin(store, ctx);
        for column in ctx.columns() {
            self.apply_column(store, ctx, column);
        }
        self.finish(store, ctx);
    }
}

/// Where a batched run currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineProgress {
    /// Name of the step being run, or of the last step once finished.
    pub step_name: &'static str,
    pub step_index: usize,
    pub step_count: usize,
    pub columns_done: usize,
    pub columns_total: usize,
    pub finished: bool,
}

impl PipelineProgress {
    /// Overall completion in [0, 1].
    pub fn fraction(&self) -> f32 {
        if self.finished || self.step_count == 0 {
            return 1.0;
        }
        let per_step = if self.columns_total == 0 {
            0.0
        } else {
            self.columns_done as f32 / self.columns_total as f32
        };
        (self.step_index as f32 + per_step) / self.step_count as f32
    }
}

/// Ordered generation steps plus a cursor for cooperative batching.
pub struct GenerationPipeline {
    steps: Vec<Box<dyn GenerationStep>>,
    step_index: usize,
    column_index: usize,
    begun: bool,
    columns: Vec<ChunkColumn>,
}

impl GenerationPipeline {
    pub fn new(steps: Vec<Box<dyn GenerationStep>>) -> Self {
        Self {
            steps,
            step_index: 0,
            column_index: 0,
            begun: false,
            columns: Vec::new(),
        }
    }

    /// Height map, ores, caves, vegetation.
    pub fn standard(ores: Vec<OreConfig>) -> Self {
        Self::new(vec![
            Box::new(HeightMapStep::new()),
            Box::new(OreStep::new(ores)),
            Box::new(CaveStep::new()),
            Box::new(VegetationStep::new()),
        ])
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn is_finished(&self) -> bool {
        self.step_index >= self.steps.len()
    }

    /// Advance by at most `budget` chunk columns. Steps always run in order;
    /// a step's `finish` completes before the next step's `begin`.
    pub fn step(&mut self, store: &mut VoxelStore, ctx: &mut WorldGenContext, budget: usize) -> PipelineProgress {
        let mut remaining = budget;

        while !self.is_finished() {
            let step = &mut self.steps[self.step_index];
            if !self.begun {
                log::debug!("Generation step '{}' starting", step.name());
                self.columns = ctx.columns();
                step.begin(store, ctx);
                self.begun = true;
                self.column_index = 0;
            }

            while self.column_index < self.columns.len() && remaining > 0 {
                step.apply_column(store, ctx, self.columns[self.column_index]);
                self.column_index += 1;
                remaining -= 1;
            }

            if self.column_index < self.columns.len() {
                break;
            }

            step.finish(store, ctx);
            log::info!("Generation step '{}' finished", step.name());
            self.step_index += 1;
            self.begun = false;

            if remaining == 0 {
                break;
            }
        }

        self.progress()
    }

    /// Run every remaining step to completion.
    pub fn run(&mut self, store: &mut VoxelStore, ctx: &mut WorldGenContext) -> PipelineProgress {
        self.step(store, ctx, usize::MAX)
    }

    pub fn progress(&self) -> PipelineProgress {
        let step_count = self.steps.len();
        let finished = self.is_finished();
        let step_name = self
            .steps
            .get(self.step_index.min(step_count.saturating_sub(1)))
            .map(|s| s.name())
            .unwrap_or("");
        PipelineProgress {
            step_name,
            step_index: self.step_index.min(step_count),
            step_count,
            columns_done: if self.begun { self.column_index } else { 0 },
            columns_total: self.columns.len(),
            finished,
        }
    }
}

impl std::fmt::Debug for GenerationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationPipeline")
            .field("steps", &self.step_names())
            .field("step_index", &self.step_index)
            .field("column_index", &self.column_index)
            .finish()
    }
}
