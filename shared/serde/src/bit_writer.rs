pub trait BitWrite {
    fn write_bit(&mut self, bit: bool);

    /// Writes the low `count` bits of `value`, lowest bit first.
    fn write_bits(&mut self, value: u32, count: u8) {
        let mut temp = value;
        for _ in 0..count {
            self.write_bit(temp & 1 != 0);
            temp >>= 1;
        }
    }

    /// Writes a Huffman code of `length` bits, most significant bit first,
    /// which is how DEFLATE packs codes into its LSB-first stream.
    fn write_code(&mut self, code: u16, length: u8) {
        for i in (0..length).rev() {
            self.write_bit((code >> i) & 1 != 0);
        }
    }

    fn write_byte(&mut self, byte: u8) {
        self.write_bits(u32::from(byte), 8);
    }
}

/// A growable LSB-first bit writer.
pub struct BitWriter {
    scratch: u8,
    scratch_index: u8,
    buffer: Vec<u8>,
    bits_written: usize,
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            scratch: 0,
            scratch_index: 0,
            buffer: Vec::new(),
            bits_written: 0,
        }
    }

    fn flush_scratch(&mut self) {
        if self.scratch_index > 0 {
            let byte = (self.scratch << (8 - self.scratch_index)).reverse_bits();
            self.buffer.push(byte);
            self.scratch = 0;
            self.scratch_index = 0;
        }
    }

    /// Pads with zero bits up to the next byte boundary.
    pub fn align_to_byte(&mut self) {
        while self.scratch_index != 0 {
            self.write_bit(false);
        }
    }

    pub fn write_aligned_bytes(&mut self, bytes: &[u8]) {
        self.align_to_byte();
        self.buffer.extend_from_slice(bytes);
        self.bits_written += bytes.len() * 8;
    }

    pub fn to_bytes(mut self) -> Vec<u8> {
        self.flush_scratch();
        self.buffer
    }

    pub fn bits_written(&self) -> usize {
        self.bits_written
    }
}

impl BitWrite for BitWriter {
    fn write_bit(&mut self, bit: bool) {
        self.scratch <<= 1;

        if bit {
            self.scratch |= 1;
        }

        self.scratch_index += 1;
        self.bits_written += 1;

        if self.scratch_index >= 8 {
            self.buffer.push(self.scratch.reverse_bits());
            self.scratch_index = 0;
            self.scratch = 0;
        }
    }
}
