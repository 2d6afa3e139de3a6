use once_cell::sync::Lazy;

use super::{Codec, DecodeError};

const BITS_PER_CHAR: u8 = 15;
const BITS_PER_SECONDARY_CHAR: u8 = 7;
const BITS_PER_BYTE: u8 = 8;

// Inclusive code point ranges. Together they hold 32768 code points, one per
// 15-bit value, in ascending order.
const PRIMARY_RANGES: [(u32, u32); 52] = [
    (0x04A0, 0x04BF),
    (0x0500, 0x051F),
    (0x0680, 0x06BF),
    (0x0760, 0x079F),
    (0x07C0, 0x07DF),
    (0x1000, 0x101F),
    (0x10A0, 0x10BF),
    (0x1100, 0x115F),
    (0x1180, 0x119F),
    (0x11E0, 0x123F),
    (0x1260, 0x127F),
    (0x12E0, 0x12FF),
    (0x1320, 0x133F),
    (0x13A0, 0x13DF),
    (0x1420, 0x165F),
    (0x16A0, 0x16DF),
    (0x1780, 0x179F),
    (0x1820, 0x185F),
    (0x18C0, 0x18DF),
    (0x1980, 0x199F),
    (0x19E0, 0x19FF),
    (0x1A20, 0x1A3F),
    (0x1BC0, 0x1BDF),
    (0x1C00, 0x1C1F),
    (0x1D00, 0x1D1F),
    (0x21E0, 0x21FF),
    (0x22C0, 0x22DF),
    (0x2340, 0x23DF),
    (0x2400, 0x241F),
    (0x2500, 0x275F),
    (0x2780, 0x27BF),
    (0x2800, 0x297F),
    (0x29A0, 0x29BF),
    (0x2A20, 0x2A5F),
    (0x2A80, 0x2ABF),
    (0x2AE0, 0x2B5F),
    (0x2C00, 0x2C1F),
    (0x2C80, 0x2CDF),
    (0x2D00, 0x2D1F),
    (0x2D40, 0x2D5F),
    (0x2EA0, 0x2EDF),
    (0x31C0, 0x31DF),
    (0x3400, 0x4D9F),
    (0x4DC0, 0x9FBF),
    (0xA000, 0xA47F),
    (0xA4A0, 0xA4BF),
    (0xA500, 0xA5FF),
    (0xA640, 0xA65F),
    (0xA6A0, 0xA6DF),
    (0xA700, 0xA75F),
    (0xA780, 0xA79F),
    (0xA840, 0xA85F),
];

// 128 code points, one per 7-bit value, only ever used for the final character.
const SECONDARY_RANGES: [(u32, u32); 2] = [(0x0180, 0x019F), (0x0240, 0x029F)];

#[derive(Debug, Clone, Copy)]
struct Block {
    first: u32,
    last: u32,
    offset: u32,
    bits: u8,
}

struct Repertoire {
    // sorted by code point, used for decoding
    by_code_point: Vec<Block>,
    // sorted by value offset, one list per character width
    primary: Vec<Block>,
    secondary: Vec<Block>,
}

fn blocks(ranges: &[(u32, u32)], bits: u8) -> Vec<Block> {
    let mut offset = 0;
    ranges
        .iter()
        .map(|&(first, last)| {
            let block = Block {
                first,
                last,
                offset,
                bits,
            };
            offset += last - first + 1;
            block
        })
        .collect()
}

static REPERTOIRE: Lazy<Repertoire> = Lazy::new(|| {
    let primary = blocks(&PRIMARY_RANGES, BITS_PER_CHAR);
    let secondary = blocks(&SECONDARY_RANGES, BITS_PER_SECONDARY_CHAR);

    let mut by_code_point: Vec<Block> = primary.iter().chain(secondary.iter()).copied().collect();
    by_code_point.sort_by_key(|block| block.first);

    Repertoire {
        by_code_point,
        primary,
        secondary,
    }
});

fn lookup_char(character: char) -> Option<(u8, u32)> {
    let code_point = character as u32;
    let blocks = &REPERTOIRE.by_code_point;
    let index = blocks.partition_point(|block| block.last < code_point);
    let block = blocks.get(index)?;
    if code_point < block.first {
        return None;
    }
    Some((block.bits, block.offset + (code_point - block.first)))
}

fn encode_value(value: u32, bits: u8) -> char {
    let blocks = if bits == BITS_PER_CHAR {
        &REPERTOIRE.primary
    } else {
        &REPERTOIRE.secondary
    };
    let index = blocks.partition_point(|block| block.offset <= value) - 1;
    let block = blocks[index];
    // every value below 2^bits maps into a block, and every block lies below the
    // surrogate range, so the code point is always a valid char
    char::from_u32(block.first + (value - block.offset)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// qntm's base32768: 15 bits per character, with a 7-bit secondary
/// repertoire for the last character when the bit count does not divide
/// evenly. Final partial groups are padded with 1-bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base32768Codec;

impl Codec for Base32768Codec {
    fn encode(&self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity((bytes.len() * 8 + 14) / 15 * 3);
        let mut value: u32 = 0;
        let mut bit_count: u8 = 0;

        for byte in bytes {
            for shift in (0..BITS_PER_BYTE).rev() {
                value = (value << 1) | u32::from((byte >> shift) & 1);
                bit_count += 1;

                if bit_count == BITS_PER_CHAR {
                    out.push(encode_value(value, BITS_PER_CHAR));
                    value = 0;
                    bit_count = 0;
                }
            }
        }

        if bit_count != 0 {
            let width = if bit_count <= BITS_PER_SECONDARY_CHAR {
                BITS_PER_SECONDARY_CHAR
            } else {
                BITS_PER_CHAR
            };
            while bit_count < width {
                value = (value << 1) | 1;
                bit_count += 1;
            }
            out.push(encode_value(value, width));
        }

        out
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>, DecodeError> {
        let length = text.chars().count();
        let mut out = Vec::with_capacity(length * usize::from(BITS_PER_CHAR) / 8);
        let mut byte: u32 = 0;
        let mut bit_count: u8 = 0;

        for (position, character) in text.chars().enumerate() {
            let (bits, value) = lookup_char(character).ok_or(DecodeError::UnrecognizedCharacter {
                character,
                position,
            })?;

            if bits != BITS_PER_CHAR && position != length - 1 {
                return Err(DecodeError::SecondaryCharacterOutOfPosition { position });
            }

            for shift in (0..bits).rev() {
                byte = (byte << 1) | ((value >> shift) & 1);
                bit_count += 1;

                if bit_count == BITS_PER_BYTE {
                    out.push(byte as u8);
                    byte = 0;
                    bit_count = 0;
                }
            }
        }

        // whatever is left over must be the encoder's 1-bit padding
        if byte != (1 << bit_count) - 1 {
            return Err(DecodeError::PaddingMismatch {
                bit_count,
                found: byte,
            });
        }

        Ok(out)
    }
}
