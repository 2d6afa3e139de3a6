//! Raw DEFLATE decompression written from first principles. Compression
//! happens when the bundle is built, so only the decoder lives here.

mod error;
mod huffman;
mod inflater;
mod state;
mod tables;

pub use error::FormatError;
pub use huffman::{canonical_codes, HuffmanTable, TableEntry, MAX_CODE_BITS};
pub use inflater::inflate;
pub use state::{InflateState, OutputBuffer};
pub use tables::{fixed_distance_lengths, fixed_literal_lengths};
