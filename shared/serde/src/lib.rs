//! # Tickboot Serde
//! Bit-granular reading and writing of LSB-first streams, the bit order used
//! by raw DEFLATE data.

mod bit_reader;
mod bit_writer;
mod error;

pub use bit_reader::BitReader;
pub use bit_writer::{BitWrite, BitWriter};
pub use error::SerdeErr;
