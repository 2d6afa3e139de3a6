use thiserror::Error;

use crate::{codec::DecodeError, inflate::FormatError};

/// Errors that abort decoding of a manifest. The first failing entry stops
/// the whole decode, and its codec or inflate error is carried unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// The manifest text could not be parsed
    #[error("Failed to parse manifest: {message}")]
    Parse { message: String },

    /// An entry did not have exactly one payload field, or similar shape problems
    #[error("Invalid manifest entry '{path}': {reason}")]
    InvalidEntry { path: String, reason: &'static str },

    /// The same logical path appeared twice
    #[error("Duplicate manifest path '{path}'")]
    DuplicatePath { path: String },

    /// The entry's payload text was malformed
    #[error("Failed to decode payload of '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: DecodeError,
    },

    /// The entry's compressed data was malformed
    #[error("Failed to inflate '{path}': {source}")]
    Inflate {
        path: String,
        #[source]
        source: FormatError,
    },

    /// Decompressed data was shorter or longer than the size recorded at build time
    #[error("Decompressed size of '{path}' is {actual} bytes, expected {expected}")]
    SizeMismatch {
        path: String,
        expected: u32,
        actual: usize,
    },

    /// Decoded contents did not match the CRC-32 recorded at build time
    #[error("Checksum of '{path}' is {actual:#010x}, expected {expected:#010x}")]
    ChecksumMismatch {
        path: String,
        expected: u32,
        actual: u32,
    },
}

impl ManifestError {
    /// The path of the entry that failed, when the error concerns one entry
    pub fn path(&self) -> Option<&str> {
        match self {
            ManifestError::Parse { .. } => None,
            ManifestError::InvalidEntry { path, .. }
            | ManifestError::DuplicatePath { path }
            | ManifestError::Decode { path, .. }
            | ManifestError::Inflate { path, .. }
            | ManifestError::SizeMismatch { path, .. }
            | ManifestError::ChecksumMismatch { path, .. } => Some(path),
        }
    }

    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            ManifestError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            ManifestError::Inflate { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(err: serde_json::Error) -> Self {
        ManifestError::Parse {
            message: err.to_string(),
        }
    }
}
