use thiserror::Error;

/// Fatal configuration problems. Raised before any block is written.
#[derive(Debug, Error, PartialEq)]
pub enum WorldGenError {
    #[error("World {axis} size {value} is not a multiple of the chunk size {chunk_size}")]
    NotChunkAligned {
        axis: &'static str,
        value: u32,
        chunk_size: u32,
    },
    #[error("World {0} size must be positive")]
    EmptyDimension(&'static str),
    #[error("Minimum elevation {min} must be below max Y {max}")]
    InvalidElevation { min: i32, max: i32 },
    #[error("Required block '{0}' is not registered")]
    MissingBlock(String),
    #[error("Invalid generation setting: {0}")]
    InvalidSetting(String),
    #[error("Failed to parse world settings RON: {0}")]
    SettingsParseError(String),
}
