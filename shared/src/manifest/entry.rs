use serde::{Deserialize, Serialize};

use crate::codec::{DecodeError, Encoding};

use super::error::ManifestError;

/// Encoded file contents, one variant per text codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Base64(String),
    Base32768(String),
}

impl Payload {
    /// Encodes `bytes` with the given codec
    pub fn encode(encoding: Encoding, bytes: &[u8]) -> Self {
        let text = encoding.encode(bytes);
        match encoding {
            Encoding::Base64 => Payload::Base64(text),
            Encoding::Base32768 => Payload::Base32768(text),
        }
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            Payload::Base64(_) => Encoding::Base64,
            Payload::Base32768(_) => Encoding::Base32768,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Payload::Base64(text) | Payload::Base32768(text) => text,
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        self.encoding().decode(self.text())
    }
}

/// Whether a payload holds raw DEFLATE data, and how large it inflates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    Deflate { original_size: Option<u32> },
}

impl Compression {
    pub fn is_compressed(&self) -> bool {
        matches!(self, Compression::Deflate { .. })
    }
}

/// CRC-32 of a file's contents, as recorded in a manifest entry
pub fn checksum(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

/// One file of a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawManifestEntry", into = "RawManifestEntry")]
pub struct ManifestEntry {
    path: String,
    payload: Payload,
    compression: Compression,
    checksum: Option<u32>,
}

impl ManifestEntry {
    pub fn new(path: impl Into<String>, payload: Payload, compression: Compression) -> Self {
        Self {
            path: path.into(),
            payload,
            compression,
            checksum: None,
        }
    }

    /// Records the CRC-32 the decoded contents must match
    pub fn with_checksum(mut self, checksum: u32) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// Uncompressed entry holding `bytes` in the given encoding
    pub fn encode(path: impl Into<String>, encoding: Encoding, bytes: &[u8]) -> Self {
        Self::new(path, Payload::encode(encoding, bytes), Compression::None)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn checksum(&self) -> Option<u32> {
        self.checksum
    }
}

// Field-presence layout used on the wire
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifestEntry {
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    b64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    b32768: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    compressed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    original_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    crc32: Option<u32>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TryFrom<RawManifestEntry> for ManifestEntry {
    type Error = ManifestError;

    fn try_from(raw: RawManifestEntry) -> Result<Self, Self::Error> {
        let payload = match (raw.b64, raw.b32768) {
            (Some(text), None) => Payload::Base64(text),
            (None, Some(text)) => Payload::Base32768(text),
            (Some(_), Some(_)) => {
                return Err(ManifestError::InvalidEntry {
                    path: raw.path,
                    reason: "both 'b64' and 'b32768' are present",
                })
            }
            (None, None) => {
                return Err(ManifestError::InvalidEntry {
                    path: raw.path,
                    reason: "neither 'b64' nor 'b32768' is present",
                })
            }
        };

        let compression = if raw.compressed {
            Compression::Deflate {
                original_size: raw.original_size,
            }
        } else {
            Compression::None
        };

        Ok(Self {
            path: raw.path,
            payload,
            compression,
            checksum: raw.crc32,
        })
    }
}

impl From<ManifestEntry> for RawManifestEntry {
    fn from(entry: ManifestEntry) -> Self {
        let (b64, b32768) = match entry.payload {
            Payload::Base64(text) => (Some(text), None),
            Payload::Base32768(text) => (None, Some(text)),
        };
        let (compressed, original_size) = match entry.compression {
            Compression::None => (false, None),
            Compression::Deflate { original_size } => (true, original_size),
        };
        Self {
            path: entry.path,
            b64,
            b32768,
            compressed,
            original_size,
            crc32: entry.checksum,
        }
    }
}
