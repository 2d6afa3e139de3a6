use std::io::Write;

use tickboot_shared::{Compression, Encoding, Manifest, ManifestEntry, Payload};

/// Fluent builder for manifests, compressing with the reference encoder
pub struct ManifestBuilder {
    encoding: Encoding,
    entries: Vec<ManifestEntry>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            encoding: Encoding::Base64,
            entries: Vec::new(),
        }
    }

    /// Encoding used by entries added after this call
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn file(mut self, path: &str, bytes: &[u8]) -> Self {
        self.entries.push(ManifestEntry::encode(path, self.encoding, bytes));
        self
    }

    pub fn compressed_file(mut self, path: &str, bytes: &[u8]) -> Self {
        let mut encoder =
            flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(bytes).expect("compressing into memory");
        let compressed = encoder.finish().expect("compressing into memory");

        self.entries.push(ManifestEntry::new(
            path,
            Payload::encode(self.encoding, &compressed),
            Compression::Deflate {
                original_size: Some(bytes.len() as u32),
            },
        ));
        self
    }

    /// A managed assembly under the default assembly root
    pub fn assembly(self, name: &str, bytes: &[u8]) -> Self {
        self.compressed_file(&format!("./managed/{name}.dll"), bytes)
    }

    pub fn build(self) -> Manifest {
        Manifest::new(self.entries)
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
