//! The manifest: a list of encoded (and optionally compressed) files that is
//! embedded in the deployed bundle and unpacked once at startup.

mod decoder;
mod entry;
mod error;
mod file_map;

use serde::{Deserialize, Serialize};

pub use decoder::ManifestDecoder;
pub use entry::{checksum, Compression, ManifestEntry, Payload};
pub use error::ManifestError;
pub use file_map::{normalize_path, FileMap};

/// An ordered list of manifest entries, serialized as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn push(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shorthand for [`ManifestDecoder::decode`]
    pub fn decode(&self) -> Result<FileMap, ManifestError> {
        ManifestDecoder::decode(&self.entries)
    }
}

impl From<Vec<ManifestEntry>> for Manifest {
    fn from(entries: Vec<ManifestEntry>) -> Self {
        Self::new(entries)
    }
}
