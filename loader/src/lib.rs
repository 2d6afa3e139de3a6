//! # Tickboot Loader
//! Unpacks a tickboot manifest and boots an embedded managed runtime inside
//! a host that only grants one synchronous slice of execution per tick.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tickboot_shared::{
        Compression, Console, ConsoleLogger, Encoding, FileMap, LogSink, Manifest, ManifestEntry,
        ManifestError, MemorySink, Payload, Scheduler, StdoutSink, TimerHandle,
    };
}

mod barrier;
mod config;
mod error;
mod fetch;
mod host;
mod profile;
mod runtime;
mod sequencer;
mod symbols;

pub use barrier::TickBarrier;
pub use config::{EntryMode, LoaderConfig, RuntimeConfig};
pub use error::{LoaderError, RuntimeFault};
pub use fetch::{FetchResponse, ResourceFetcher};
pub use host::HostAdapter;
pub use profile::{PerfFn, StageTimer};
pub use runtime::{
    AssemblyExports, ImportFn, ImportTable, ManagedRuntime, ModuleImports, RuntimeEnv,
    RuntimeFactory, RuntimeSetup, RuntimeSetupFn,
};
pub use sequencer::{BootSequencer, BootState};
pub use symbols::SymbolMap;
