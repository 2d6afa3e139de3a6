use once_cell::sync::Lazy;

use super::huffman::HuffmanTable;

pub(crate) const END_OF_BLOCK: u16 = 256;
pub(crate) const FIRST_LENGTH_SYMBOL: u16 = 257;
pub(crate) const LAST_LENGTH_SYMBOL: u16 = 285;
pub(crate) const DISTANCE_SYMBOLS: u16 = 30;

pub(crate) const MAX_LITERAL_CODES: usize = 286;
pub(crate) const MAX_DISTANCE_CODES: usize = 30;

pub(crate) const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

pub(crate) const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

pub(crate) const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

pub(crate) const DISTANCE_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Order in which a dynamic block lists the lengths of the code-length alphabet
pub(crate) const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Code lengths of the fixed literal/length alphabet used by static blocks
pub fn fixed_literal_lengths() -> [u8; 288] {
    let mut lengths = [0u8; 288];
    for (symbol, length) in lengths.iter_mut().enumerate() {
        *length = match symbol {
            0..=143 => 8,
            144..=255 => 9,
            256..=279 => 7,
            _ => 8,
        };
    }
    lengths
}

/// Code lengths of the fixed distance alphabet used by static blocks
pub fn fixed_distance_lengths() -> [u8; 32] {
    [5; 32]
}

pub(crate) static FIXED_LITERAL_TABLE: Lazy<HuffmanTable> =
    Lazy::new(|| HuffmanTable::from_complete_lengths(&fixed_literal_lengths()));

pub(crate) static FIXED_DISTANCE_TABLE: Lazy<HuffmanTable> =
    Lazy::new(|| HuffmanTable::from_complete_lengths(&fixed_distance_lengths()));
