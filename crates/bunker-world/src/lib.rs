pub mod chunk;
pub mod error;
pub mod generation;
pub mod noise_source;
pub mod rng;
pub mod settings;
pub mod store;
pub mod tree;

pub use chunk::{BlockInstance, Chunk};
pub use error::WorldGenError;
pub use generation::{generate, GeneratedWorld, GenerationPipeline, GenerationStep, HeightMap, WorldGenContext, WorldGenerator};
pub use noise_source::NoiseSource;
pub use settings::WorldGenSettings;
pub use store::{Slice, VoxelStore, WorldDims};
pub use tree::{TreeList, TreeRecord};
