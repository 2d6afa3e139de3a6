use ::base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD},
        DecodePaddingMode,
    },
    DecodeError as Base64Error, Engine,
};

use super::{Codec, DecodeError};

const PAD: char = '=';

// Padding is stripped before decoding and stray low bits are ignored.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Standard base64. Decoding also accepts the URL-safe alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

fn unrecognized(text: &str, offset: usize) -> DecodeError {
    let character = text
        .get(offset..)
        .and_then(|rest| rest.chars().next())
        .unwrap_or(PAD);
    let position = text.get(..offset).map_or(offset, |head| head.chars().count());
    DecodeError::UnrecognizedCharacter {
        character,
        position,
    }
}

impl Codec for Base64Codec {
    fn encode(&self, bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>, DecodeError> {
        let trimmed = text.trim_end_matches(PAD);
        let length = trimmed.chars().count();
        if length % 4 == 1 {
            return Err(DecodeError::InvalidLength { length });
        }

        let standard: String = trimmed
            .chars()
            .map(|character| match character {
                '-' => '+',
                '_' => '/',
                other => other,
            })
            .collect();

        LENIENT.decode(standard).map_err(|err| match err {
            Base64Error::InvalidByte(offset, _)
            | Base64Error::InvalidLastSymbol(offset, _) => unrecognized(trimmed, offset),
            Base64Error::InvalidPadding => {
                unrecognized(trimmed, trimmed.find(PAD).unwrap_or(trimmed.len()))
            }
            Base64Error::InvalidLength(_) => match trimmed.find(|c: char| !c.is_ascii()) {
                Some(offset) => unrecognized(trimmed, offset),
                None => DecodeError::InvalidLength { length },
            },
        })
    }
}
