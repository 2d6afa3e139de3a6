//! Console output shared by the loader and the `log` facade.

mod console;
mod logger;
mod sink;

pub use console::{Console, Severity};
pub use logger::ConsoleLogger;
pub use sink::{LogSink, MemorySink, StdoutSink};
