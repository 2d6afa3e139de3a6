use std::fmt;

use super::{CallbackResult, Scheduler};

/// Identifies one scheduled timer. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u32);

impl TimerHandle {
    pub(crate) fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Fires once, created by `set_timeout` or `set_immediate`
    Timeout,
    /// Fires every `interval` until cleared
    Interval,
}

pub type TimerCallback = Box<dyn FnMut(&mut Scheduler) -> CallbackResult>;

pub(crate) struct TimerEntry {
    pub(crate) handle: TimerHandle,
    pub(crate) callback: TimerCallback,
    pub(crate) next_time: u64,
    pub(crate) interval: Option<u64>,
}

impl TimerEntry {
    pub(crate) fn kind(&self) -> TimerKind {
        match self.interval {
            Some(_) => TimerKind::Interval,
            None => TimerKind::Timeout,
        }
    }
}

impl fmt::Debug for TimerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEntry")
            .field("handle", &self.handle)
            .field("next_time", &self.next_time)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
