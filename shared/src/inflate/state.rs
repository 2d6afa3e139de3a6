use super::error::FormatError;

/// How the inflate engine should size its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputBuffer {
    /// Unknown output size: start at `initial_capacity` and double as needed
    Growable { initial_capacity: usize },
    /// Known output size: allocate exactly once, writing past it is an error
    Fixed(usize),
}

impl Default for OutputBuffer {
    fn default() -> Self {
        OutputBuffer::Growable {
            initial_capacity: 0,
        }
    }
}

/// Output produced so far, which doubles as the back-reference window.
#[derive(Debug, Clone, Default)]
pub(crate) struct OutputWindow {
    bytes: Vec<u8>,
    limit: Option<usize>,
}

impl OutputWindow {
    pub(crate) fn new(output: OutputBuffer) -> Self {
        match output {
            OutputBuffer::Growable { initial_capacity } => Self {
                bytes: Vec::with_capacity(initial_capacity),
                limit: None,
            },
            OutputBuffer::Fixed(size) => Self {
                bytes: Vec::with_capacity(size),
                limit: Some(size),
            },
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    pub(crate) fn into_bytes(mut self) -> Vec<u8> {
        self.bytes.shrink_to_fit();
        self.bytes
    }

    fn reserve(&mut self, additional: usize) -> Result<(), FormatError> {
        if let Some(limit) = self.limit {
            if self.bytes.len() + additional > limit {
                return Err(FormatError::OutputOverflow { limit });
            }
            return Ok(());
        }
        let needed = self.bytes.len() + additional;
        if needed > self.bytes.capacity() {
            let doubled = (self.bytes.capacity() * 2).max(needed);
            self.bytes.reserve_exact(doubled - self.bytes.len());
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, byte: u8) -> Result<(), FormatError> {
        self.reserve(1)?;
        self.bytes.push(byte);
        Ok(())
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        self.reserve(bytes.len())?;
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    /// Copies `length` bytes starting `distance` bytes back. Positions before
    /// the start of the output are served from the tail of `dictionary`.
    pub(crate) fn copy_match(
        &mut self,
        length: usize,
        distance: usize,
        dictionary: &[u8],
    ) -> Result<(), FormatError> {
        let available = self.bytes.len() + dictionary.len();
        if distance == 0 || distance > available {
            return Err(FormatError::InvalidDistance {
                distance,
                available,
            });
        }
        self.reserve(length)?;

        for _ in 0..length {
            let position = self.bytes.len();
            let byte = if distance <= position {
                self.bytes[position - distance]
            } else {
                dictionary[dictionary.len() - (distance - position)]
            };
            self.bytes.push(byte);
        }
        Ok(())
    }
}

/// Decoder state that survives between calls when input arrives in pieces.
///
/// The state is only resumable while [`InflateState::is_final`] is false.
/// Once the final block has been consumed every further call produces no
/// output.
#[derive(Debug, Clone, Default)]
pub struct InflateState {
    pub(crate) bit_position: usize,
    pub(crate) final_block: bool,
    pub(crate) window: OutputWindow,
    pub(crate) started: bool,
}

impl InflateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the final block has been fully decoded
    pub fn is_final(&self) -> bool {
        self.final_block
    }

    /// Bit offset into the (cumulative) input where decoding resumes
    pub fn bit_position(&self) -> usize {
        self.bit_position
    }

    /// Total bytes produced across all calls
    pub fn total_out(&self) -> usize {
        self.window.len()
    }

    /// Everything produced so far
    pub fn output(&self) -> &[u8] {
        self.window.bytes()
    }
}
