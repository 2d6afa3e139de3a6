use thiserror::Error;

use tickboot_serde::SerdeErr;

/// Errors raised while decompressing a raw DEFLATE stream. The input is
/// static deployed data, so none of these are worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The stream ended before the final block was complete
    #[error("Unexpected end of compressed stream")]
    UnexpectedEof,

    /// Block type 3 is reserved
    #[error("Invalid block type {block_type} (only 0, 1 and 2 are defined)")]
    InvalidBlockType { block_type: u8 },

    /// A stored block's length did not match its one's complement
    #[error("Stored block length {length:#06x} does not match its complement {complement:#06x}")]
    StoredLengthMismatch { length: u16, complement: u16 },

    /// A dynamic block header declared more codes than the alphabets hold
    #[error("Invalid dynamic block header: {literal_codes} literal/length codes, {distance_codes} distance codes")]
    InvalidHeader {
        literal_codes: usize,
        distance_codes: usize,
    },

    /// A set of code lengths does not describe a usable prefix code
    #[error("Invalid code lengths: {reason}")]
    InvalidCodeLengths { reason: &'static str },

    /// The code-length alphabet produced an undefined symbol
    #[error("Invalid code length symbol at bit {bit_position}")]
    InvalidCodeLengthSymbol { bit_position: usize },

    /// A repeat-previous code length appeared before any length was read
    #[error("Code length repeat with no previous length")]
    RepeatWithoutPrevious,

    /// Run-length codes expanded past the declared number of code lengths
    #[error("Code length run of {run} at index {index} overflows {total} lengths")]
    CodeLengthOverflow {
        index: usize,
        run: usize,
        total: usize,
    },

    /// The literal/length table had no symbol for the upcoming bits
    #[error("Invalid literal/length code at bit {bit_position}")]
    InvalidLiteralLength { bit_position: usize },

    /// The distance table had no symbol for the upcoming bits
    #[error("Invalid distance code at bit {bit_position}")]
    InvalidDistanceCode { bit_position: usize },

    /// A back-reference reached before the start of the output and dictionary
    #[error("Invalid back-reference distance {distance}: only {available} bytes available")]
    InvalidDistance { distance: usize, available: usize },

    /// Decompressed data did not fit the caller's fixed-size output buffer
    #[error("Decompressed data exceeds the fixed output size of {limit} bytes")]
    OutputOverflow { limit: usize },

    /// Any other malformed bit-level read
    #[error("Malformed bit stream: {0}")]
    BitStream(SerdeErr),
}

impl From<SerdeErr> for FormatError {
    fn from(err: SerdeErr) -> Self {
        match err {
            SerdeErr::UnexpectedEnd { .. } => FormatError::UnexpectedEof,
            other => FormatError::BitStream(other),
        }
    }
}
