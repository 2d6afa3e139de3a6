use thiserror::Error;

/// Errors that can occur while decoding an encoded manifest payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A character outside the codec's alphabet was found
    #[error("Unrecognized character {character:?} at position {position}")]
    UnrecognizedCharacter { character: char, position: usize },

    /// A base32768 secondary (7-bit) character appeared before the final position
    #[error("Secondary character out of position: found at {position}, only allowed as the final character")]
    SecondaryCharacterOutOfPosition { position: usize },

    /// The trailing padding bits of a base32768 string were not all 1-bits
    #[error("Padding mismatch: trailing {bit_count} bits were {found:#b}, expected all ones")]
    PaddingMismatch { bit_count: u8, found: u32 },

    /// The input length (after stripping padding) cannot be produced by the encoder
    #[error("Invalid encoded length {length}: not a valid base64 length once padding is removed")]
    InvalidLength { length: usize },
}
