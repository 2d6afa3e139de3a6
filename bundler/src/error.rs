use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while building a bundle
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse mono-config.json: {0}")]
    MonoConfig(#[source] serde_json::Error),

    #[error("Failed to serialize bundle: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to compress '{path}': {source}")]
    Compress {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Asset '{path}' is {size} bytes, larger than a manifest entry can describe")]
    TooLarge { path: String, size: usize },

    #[error("Compression level {level} is out of range (0-9)")]
    InvalidLevel { level: u32 },
}
