use std::sync::{Arc, Mutex};

/// Destination for finished console lines.
pub trait LogSink: Send {
    fn write_line(&mut self, line: &str);
}

/// Writes every line to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Keeps lines in memory. Clones share the same buffer, so a test can hand
/// one clone to a [`Console`](super::Console) and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn clear(&self) {
        match self.lines.lock() {
            Ok(mut lines) => lines.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl LogSink for MemorySink {
    fn write_line(&mut self, line: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(line.to_string()),
        }
    }
}
