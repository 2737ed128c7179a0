//! Error types for cave generation and export.

use thiserror::Error;

/// Minimum width and height accepted by the generator. Anything smaller has no
/// interior once the outer ring is forced to wall.
pub const MIN_DIMENSION: usize = 3;

/// Largest finished map (border included) the generator will allocate.
pub const MAX_CELLS: usize = 1 << 26;

#[derive(Error, Debug)]
pub enum CaveError {
    #[error("map must be at least {min}x{min}, got {width}x{height}", min = MIN_DIMENSION)]
    InvalidDimensions { width: usize, height: usize },

    #[error("map of {width}x{height} with its border exceeds {max} cells", max = MAX_CELLS)]
    MapTooLarge { width: usize, height: usize },

    #[error("fill percent must be between 0 and 100, got {0}")]
    InvalidFillPercent(u32),

    #[error("a generation is already running on this generator")]
    GenerationInProgress,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, CaveError>;
