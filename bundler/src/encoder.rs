use std::io::Write;

use flate2::{write::DeflateEncoder, Compression as Level};
use log::debug;

use tickboot_shared::{checksum, Compression, ManifestEntry, Payload};

use crate::{config::BundlerConfig, error::BundleError};

const MAX_LEVEL: u32 = 9;

/// Turns file contents into manifest entries according to a
/// [`BundlerConfig`].
#[derive(Debug, Clone)]
pub struct ManifestEncoder {
    config: BundlerConfig,
}

impl ManifestEncoder {
    pub fn new(config: BundlerConfig) -> Result<Self, BundleError> {
        if config.level > MAX_LEVEL {
            return Err(BundleError::InvalidLevel {
                level: config.level,
            });
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &BundlerConfig {
        &self.config
    }

    /// Builds the entry for one file, stamped with the CRC-32 of `bytes`.
    /// Compressed entries record their original size so the loader can
    /// allocate the output exactly once.
    pub fn encode_file(&self, path: &str, bytes: &[u8]) -> Result<ManifestEntry, BundleError> {
        if !self.config.compress {
            return Ok(ManifestEntry::encode(path, self.config.encoding, bytes)
                .with_checksum(checksum(bytes)));
        }

        let original_size = u32::try_from(bytes.len()).map_err(|_| BundleError::TooLarge {
            path: path.to_string(),
            size: bytes.len(),
        })?;
        let compressed = self.deflate(path, bytes)?;
        debug!(
            "Compressed '{}' from {} to {} bytes",
            path,
            bytes.len(),
            compressed.len()
        );

        Ok(ManifestEntry::new(
            path,
            Payload::encode(self.config.encoding, &compressed),
            Compression::Deflate {
                original_size: Some(original_size),
            },
        )
        .with_checksum(checksum(bytes)))
    }

    fn deflate(&self, path: &str, bytes: &[u8]) -> Result<Vec<u8>, BundleError> {
        let to_error = |source| BundleError::Compress {
            path: path.to_string(),
            source,
        };
        let mut encoder = DeflateEncoder::new(Vec::new(), Level::new(self.config.level));
        encoder.write_all(bytes).map_err(to_error)?;
        encoder.finish().map_err(to_error)
    }
}
