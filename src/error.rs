//! Error types for pyro.
//!
//! Nothing in the simulation is fatal to the host: bursts that cannot be
//! generated degrade to a fallback shape or to "no particles", and only the
//! boundary operations (`launch`, `update`, image and config loading) report
//! failures back to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by the firework engine.
#[derive(Debug, Error)]
pub enum FireworkError {
    /// A raw shape tag outside the known set was passed in.
    #[error("Unknown firework shape tag {0}")]
    InvalidShape(u32),

    /// `update` was called with a negative or non-finite time step.
    #[error("Invalid time step {0}: delta time must be finite and >= 0")]
    InvalidDelta(f32),

    /// A launch or generator argument was out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An image shell exploded without decoded pixel data attached.
    #[error("Image firework has no image attached")]
    MissingImage,

    /// The image decoded to zero pixels.
    #[error("Image has no pixels")]
    EmptyImage,

    /// Failed to decode an image file.
    #[error("Failed to load image '{}': {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to read a file from disk.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a JSON configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FireworkError>;
