//! Text-safe encodings for binary manifest payloads.

mod base32768;
mod base64;
mod error;

use serde::{Deserialize, Serialize};

pub use base32768::Base32768Codec;
pub use self::base64::Base64Codec;
pub use error::DecodeError;

/// A reversible mapping between bytes and text that can be embedded in
/// generated script source.
pub trait Codec {
    fn encode(&self, bytes: &[u8]) -> String;

    fn decode(&self, text: &str) -> Result<Vec<u8>, DecodeError>;
}

/// Which codec a manifest entry's payload was written with. This is decided
/// when the bundle is built, never inferred while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// 6 bits per ASCII character
    Base64,
    /// 15 bits per (non-ASCII) code point
    Base32768,
}

impl Encoding {
    pub fn codec(self) -> &'static dyn Codec {
        match self {
            Encoding::Base64 => &Base64Codec,
            Encoding::Base32768 => &Base32768Codec,
        }
    }

    /// The manifest field name carrying a payload in this encoding
    pub fn wire_key(self) -> &'static str {
        match self {
            Encoding::Base64 => "b64",
            Encoding::Base32768 => "b32768",
        }
    }

    pub fn encode(self, bytes: &[u8]) -> String {
        self.codec().encode(bytes)
    }

    pub fn decode(self, text: &str) -> Result<Vec<u8>, DecodeError> {
        self.codec().decode(text)
    }
}
