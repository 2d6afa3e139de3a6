use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use super::console::{Console, Severity};

/// Routes the `log` macros into a [`Console`], so library diagnostics share
/// its ordering and suppression.
pub struct ConsoleLogger {
    console: Console,
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(console: Console, level: LevelFilter) -> Self {
        Self { console, level }
    }

    /// Installs a logger writing to `console` as the global `log` backend.
    pub fn init(console: Console, level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(Self::new(console, level)))?;
        log::set_max_level(level);
        Ok(())
    }

    fn severity(level: Level) -> Severity {
        match level {
            Level::Error => Severity::Error,
            Level::Warn => Severity::Warn,
            Level::Info => Severity::Log,
            Level::Debug => Severity::Debug,
            Level::Trace => Severity::Trace,
        }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.console
            .write(Self::severity(record.level()), record.args());
    }

    fn flush(&self) {}
}
