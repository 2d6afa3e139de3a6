use std::{
    fmt::Display,
    sync::{Arc, Mutex, MutexGuard},
};

use super::sink::{LogSink, StdoutSink};

/// Severity of a console line, rendered as a tag in front of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Log,
    Warn,
    Debug,
    Error,
    Trace,
    Assert,
}

impl Severity {
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Log => "",
            Severity::Warn => "WARN: ",
            Severity::Debug => "DEBUG: ",
            Severity::Error => "ERROR: ",
            Severity::Trace => "TRACE: ",
            Severity::Assert => "ASSERTION FAIL: ",
        }
    }
}

struct ConsoleState {
    sink: Box<dyn LogSink>,
    prefix: String,
    suppressed: bool,
    queued: Vec<String>,
}

/// Line-oriented diagnostic output with a suppressed mode.
///
/// While suppressed, lines are queued in memory; lifting suppression
/// flushes them to the sink in their original order. Clones share state.
#[derive(Clone)]
pub struct Console {
    state: Arc<Mutex<ConsoleState>>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(StdoutSink)
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Console")
            .field("prefix", &state.prefix)
            .field("suppressed", &state.suppressed)
            .field("queued", &state.queued.len())
            .finish()
    }
}

impl Console {
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self {
            state: Arc::new(Mutex::new(ConsoleState {
                sink: Box::new(sink),
                prefix: String::new(),
                suppressed: false,
                queued: Vec::new(),
            })),
        }
    }

    /// Text written in front of every line, before the severity tag
    pub fn with_prefix(self, prefix: impl Into<String>) -> Self {
        self.lock().prefix = prefix.into();
        self
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn write(&self, severity: Severity, message: impl Display) {
        let mut state = self.lock();
        let line = format!("{}{}{}", state.prefix, severity.tag(), message);
        if state.suppressed {
            state.queued.push(line);
        } else {
            state.sink.write_line(&line);
        }
    }

    pub fn log(&self, message: impl Display) {
        self.write(Severity::Log, message);
    }

    pub fn warn(&self, message: impl Display) {
        self.write(Severity::Warn, message);
    }

    pub fn debug(&self, message: impl Display) {
        self.write(Severity::Debug, message);
    }

    pub fn error(&self, message: impl Display) {
        self.write(Severity::Error, message);
    }

    pub fn trace(&self, message: impl Display) {
        self.write(Severity::Trace, message);
    }

    /// Writes `message` only when `condition` is false
    pub fn assert(&self, condition: bool, message: impl Display) {
        if !condition {
            self.write(Severity::Assert, message);
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.lock().suppressed
    }

    /// Lines waiting for suppression to be lifted
    pub fn queued(&self) -> usize {
        self.lock().queued.len()
    }

    pub fn set_suppressed(&self, suppressed: bool) {
        let mut state = self.lock();
        state.suppressed = suppressed;
        if suppressed {
            return;
        }
        let queued = std::mem::take(&mut state.queued);
        for line in &queued {
            state.sink.write_line(line);
        }
    }
}
