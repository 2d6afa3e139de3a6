use tickboot_serde::BitReader;

use super::error::FormatError;

pub const MAX_CODE_BITS: u8 = 15;

/// One slot of a decode table. A `length` of 0 marks a bit pattern that no
/// code starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableEntry {
    pub length: u8,
    pub symbol: u16,
}

/// Flat decode table indexed by the next `max_bits` bits of input.
///
/// Every code is stored in each slot whose low bits equal the code
/// (bit-reversed, since DEFLATE packs codes MSB-first into an LSB-first
/// stream), so decoding a symbol is a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable {
    max_bits: u8,
    entries: Vec<TableEntry>,
}

fn count_lengths(lengths: &[u8]) -> [u16; MAX_CODE_BITS as usize + 1] {
    let mut counts = [0u16; MAX_CODE_BITS as usize + 1];
    for &length in lengths {
        if length <= MAX_CODE_BITS {
            counts[length as usize] += 1;
        }
    }
    counts[0] = 0;
    counts
}

fn validate_lengths(lengths: &[u8]) -> Result<(), FormatError> {
    if lengths.iter().any(|&length| length > MAX_CODE_BITS) {
        return Err(FormatError::InvalidCodeLengths {
            reason: "code length exceeds 15 bits",
        });
    }

    let counts = count_lengths(lengths);
    let mut left: i32 = 1;
    for count in counts.iter().skip(1) {
        left <<= 1;
        left -= i32::from(*count);
        if left < 0 {
            return Err(FormatError::InvalidCodeLengths {
                reason: "over-subscribed code",
            });
        }
    }
    Ok(())
}

fn assign_codes(lengths: &[u8]) -> Vec<(u8, u16)> {
    let counts = count_lengths(lengths);

    let mut next_code = [0u16; MAX_CODE_BITS as usize + 1];
    let mut code: u16 = 0;
    for bits in 1..=MAX_CODE_BITS as usize {
        code = code.wrapping_add(counts[bits - 1]).wrapping_shl(1);
        next_code[bits] = code;
    }

    lengths
        .iter()
        .map(|&length| {
            if length == 0 || length > MAX_CODE_BITS {
                return (0, 0);
            }
            let code = next_code[length as usize];
            next_code[length as usize] = code.wrapping_add(1);
            (length, code)
        })
        .collect()
}

/// Canonical Huffman assignment: symbol index -> (bit length, code).
///
/// Shorter codes get numerically smaller values and codes of equal length
/// are handed out in symbol order. Unused symbols (length 0) map to `(0, 0)`.
pub fn canonical_codes(lengths: &[u8]) -> Result<Vec<(u8, u16)>, FormatError> {
    validate_lengths(lengths)?;
    Ok(assign_codes(lengths))
}

fn reverse_bits(code: u16, length: u8) -> usize {
    let mut reversed = 0usize;
    let mut code = code;
    for _ in 0..length {
        reversed = (reversed << 1) | usize::from(code & 1);
        code >>= 1;
    }
    reversed
}

impl HuffmanTable {
    /// Builds a decode table from per-symbol code lengths. Incomplete codes
    /// are accepted (their unused patterns decode as invalid); over-subscribed
    /// ones are rejected.
    pub fn from_lengths(lengths: &[u8]) -> Result<Self, FormatError> {
        validate_lengths(lengths)?;
        Ok(Self::from_complete_lengths(lengths))
    }

    /// Builds a table from lengths known to be valid, such as the fixed
    /// alphabets of static blocks.
    pub(crate) fn from_complete_lengths(lengths: &[u8]) -> Self {
        let codes = assign_codes(lengths);
        let max_bits = codes.iter().map(|(length, _)| *length).max().unwrap_or(0);

        let mut entries = vec![TableEntry::default(); 1 << max_bits];
        for (symbol, &(length, code)) in codes.iter().enumerate() {
            if length == 0 {
                continue;
            }
            let entry = TableEntry {
                length,
                symbol: symbol as u16,
            };
            let step = 1usize << length;
            let mut index = reverse_bits(code, length);
            while index < entries.len() {
                entries[index] = entry;
                index += step;
            }
        }

        Self { max_bits, entries }
    }

    pub fn max_bits(&self) -> u8 {
        self.max_bits
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// Looks up the slot for the next `max_bits` bits without consuming them.
    pub fn lookup(&self, reader: &BitReader) -> TableEntry {
        let window = reader.peek_bits(self.max_bits) as usize;
        self.entries[window & (self.entries.len() - 1)]
    }
}
