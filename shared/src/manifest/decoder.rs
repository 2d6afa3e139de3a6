use log::info;

use crate::inflate::{inflate, OutputBuffer};

use super::{
    entry::{checksum, Compression, ManifestEntry},
    error::ManifestError,
    file_map::{FileMap, FileMapBuilder},
};

/// Turns manifest entries back into file contents.
pub struct ManifestDecoder;

impl ManifestDecoder {
    /// Decodes every entry in order. The first failing entry aborts the
    /// whole decode; no partial map is returned.
    pub fn decode(entries: &[ManifestEntry]) -> Result<FileMap, ManifestError> {
        let mut builder = FileMapBuilder::new();
        for entry in entries {
            let bytes = Self::decode_entry(entry)?;
            builder.try_insert(entry.path(), bytes)?;
        }

        let files = builder.build();
        info!(
            "Decoded {} manifest entries ({} bytes)",
            files.len(),
            files.total_bytes()
        );
        Ok(files)
    }

    /// Decodes a single entry's payload, inflating it if needed. An entry
    /// carrying a checksum must decode to contents with that CRC-32.
    pub fn decode_entry(entry: &ManifestEntry) -> Result<Vec<u8>, ManifestError> {
        let bytes = Self::unpack(entry)?;
        if let Some(expected) = entry.checksum() {
            let actual = checksum(&bytes);
            if actual != expected {
                return Err(ManifestError::ChecksumMismatch {
                    path: entry.path().to_string(),
                    expected,
                    actual,
                });
            }
        }
        Ok(bytes)
    }

    fn unpack(entry: &ManifestEntry) -> Result<Vec<u8>, ManifestError> {
        let decoded = entry
            .payload()
            .decode()
            .map_err(|source| ManifestError::Decode {
                path: entry.path().to_string(),
                source,
            })?;

        let original_size = match entry.compression() {
            Compression::None => return Ok(decoded),
            Compression::Deflate { original_size } => original_size,
        };

        let output = match original_size {
            Some(size) => OutputBuffer::Fixed(size as usize),
            None => OutputBuffer::Growable {
                initial_capacity: decoded.len() * 4,
            },
        };
        let inflated = inflate(&decoded, None, output, None).map_err(|source| {
            ManifestError::Inflate {
                path: entry.path().to_string(),
                source,
            }
        })?;

        if let Some(expected) = original_size {
            if inflated.len() != expected as usize {
                return Err(ManifestError::SizeMismatch {
                    path: entry.path().to_string(),
                    expected,
                    actual: inflated.len(),
                });
            }
        }
        Ok(inflated)
    }
}
