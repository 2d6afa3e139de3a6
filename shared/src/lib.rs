//! # Tickboot Shared
//! Manifest codecs, the inflate engine, the cooperative scheduler and console
//! output shared between the tickboot-loader & tickboot-bundler crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

cfg_if! {
    if #[cfg(all(target_arch = "wasm32", not(feature = "wbindgen")))]
    {
        compile_error!("wasm target for 'tickboot_shared' crate requires the 'wbindgen' feature to be enabled.");
    }
}

pub use tickboot_serde::{BitReader, BitWrite, BitWriter, SerdeErr};

mod backends;
pub mod codec;
pub mod inflate;
pub mod logging;
pub mod manifest;
pub mod scheduler;

pub use backends::PerfClock;
pub use codec::{Base32768Codec, Base64Codec, Codec, DecodeError, Encoding};
pub use inflate::{inflate, FormatError, InflateState, OutputBuffer};
pub use logging::{Console, ConsoleLogger, LogSink, MemorySink, Severity, StdoutSink};
pub use manifest::{
    checksum, Compression, FileMap, Manifest, ManifestDecoder, ManifestEntry, ManifestError, Payload,
};
pub use scheduler::{CallbackError, CallbackResult, Scheduler, TimerHandle, TimerKind};
