pub mod atlas;
pub mod loader;
pub mod registry;
pub mod sources;
pub mod validator;

pub use atlas::{AtlasError, TextureAtlas, UvRect};
pub use loader::{load_data_dir, GameData, LoadError};
pub use registry::BlockRegistry;
pub use validator::ValidationError;
