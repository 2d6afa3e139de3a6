use crate::error::SerdeErr;

const MAX_READ_BITS: u8 = 32;

/// Reads bit fields from a borrowed byte buffer, least significant bit of
/// each byte first.
#[derive(Debug, Clone)]
pub struct BitReader<'b> {
    buffer: &'b [u8],
    bit_pos: usize,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, bit_pos: 0 }
    }

    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Moves the cursor. Positions past the end are clamped to the end.
    pub fn set_bit_position(&mut self, bit_pos: usize) {
        self.bit_pos = bit_pos.min(self.total_bits());
    }

    pub fn total_bits(&self) -> usize {
        self.buffer.len() * 8
    }

    pub fn remaining_bits(&self) -> usize {
        self.total_bits() - self.bit_pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0
    }

    pub fn is_aligned(&self) -> bool {
        self.bit_pos % 8 == 0
    }

    /// Returns the next `count` bits without consuming them. Bits past the
    /// end of the buffer read as zero, so a decoder can look up a full table
    /// window near the end of the stream and check the real code length
    /// afterwards.
    pub fn peek_bits(&self, count: u8) -> u32 {
        let count = count.min(MAX_READ_BITS);
        if count == 0 {
            return 0;
        }
        let first_byte = self.bit_pos / 8;
        let shift = self.bit_pos % 8;

        let mut window: u64 = 0;
        for i in 0..5 {
            if let Some(byte) = self.buffer.get(first_byte + i) {
                window |= u64::from(*byte) << (8 * i);
            }
        }

        ((window >> shift) & ((1u64 << count) - 1)) as u32
    }

    /// Reads `count` bits (at most 32), first bit in the lowest position.
    pub fn read_bits(&mut self, count: u8) -> Result<u32, SerdeErr> {
        if count > MAX_READ_BITS {
            return Err(SerdeErr::ReadTooWide { requested: count });
        }
        let value = self.peek_bits(count);
        self.consume(count)?;
        Ok(value)
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Advances the cursor by `count` bits.
    pub fn consume(&mut self, count: u8) -> Result<(), SerdeErr> {
        let count = usize::from(count);
        let available = self.remaining_bits();
        if count > available {
            return Err(SerdeErr::UnexpectedEnd {
                requested: count,
                available,
            });
        }
        self.bit_pos += count;
        Ok(())
    }

    /// Skips to the next byte boundary. No-op when already aligned.
    pub fn align_to_byte(&mut self) {
        let aligned = (self.bit_pos + 7) / 8 * 8;
        self.set_bit_position(aligned);
    }

    /// Reads `len` whole bytes. The cursor must sit on a byte boundary.
    pub fn read_aligned_bytes(&mut self, len: usize) -> Result<&'b [u8], SerdeErr> {
        if !self.is_aligned() {
            return Err(SerdeErr::Unaligned {
                bit_position: self.bit_pos,
            });
        }
        let start = self.bit_pos / 8;
        let available = self.buffer.len() - start;
        if len > available {
            return Err(SerdeErr::UnexpectedEnd {
                requested: len * 8,
                available: available * 8,
            });
        }
        self.bit_pos += len * 8;
        Ok(&self.buffer[start..start + len])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, SerdeErr> {
        let bytes = self.read_aligned_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }
}
