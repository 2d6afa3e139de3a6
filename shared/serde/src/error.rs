use thiserror::Error;

/// Errors that can occur while reading a bit stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The stream ended before the requested bits could be read
    #[error("Unexpected end of stream: requested {requested} bits but only {available} remain")]
    UnexpectedEnd { requested: usize, available: usize },

    /// A byte-aligned read was attempted while the cursor sat mid-byte
    #[error("Byte-aligned read attempted at bit position {bit_position}")]
    Unaligned { bit_position: usize },

    /// More than 32 bits were requested in a single read
    #[error("Cannot read {requested} bits at once (maximum is 32)")]
    ReadTooWide { requested: u8 },
}
