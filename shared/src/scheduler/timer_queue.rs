use std::collections::HashSet;

use log::{debug, error, warn};

use super::{
    timer::{TimerCallback, TimerEntry, TimerHandle, TimerKind},
    CallbackResult,
};

/// Virtual timer queue driven one host tick at a time.
///
/// There are no real timers: time only moves when [`Scheduler::advance`]
/// runs, and it jumps straight to the earliest due entry. Entries are kept
/// sorted by due time, ties in insertion order.
///
/// While a drain is running, scheduling and cancelling are buffered and
/// applied once the pass finishes.
#[derive(Debug)]
pub struct Scheduler {
    now: u64,
    next_handle: u32,
    queue: Vec<TimerEntry>,
    draining: bool,
    stop_requested: bool,
    pending_inserts: Vec<TimerEntry>,
    pending_cancels: HashSet<(TimerHandle, TimerKind)>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_handle: 1,
            queue: Vec::new(),
            draining: false,
            stop_requested: false,
            pending_inserts: Vec::new(),
            pending_cancels: HashSet::new(),
        }
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of scheduled timers, including ones buffered by a running drain
    pub fn pending(&self) -> usize {
        self.queue.len() + self.pending_inserts.len()
    }

    pub fn is_draining(&self) -> bool {
        self.draining
    }

    /// Due time of the earliest queued timer
    pub fn next_due(&self) -> Option<u64> {
        self.queue.first().map(|entry| entry.next_time)
    }

    pub fn set_timeout<F>(&mut self, delay: u64, callback: F) -> TimerHandle
    where
        F: FnMut(&mut Scheduler) -> CallbackResult + 'static,
    {
        let next_time = self.now.saturating_add(delay);
        self.schedule(Box::new(callback), next_time, None)
    }

    pub fn set_interval<F>(&mut self, interval: u64, callback: F) -> TimerHandle
    where
        F: FnMut(&mut Scheduler) -> CallbackResult + 'static,
    {
        let next_time = self.now.saturating_add(interval);
        self.schedule(Box::new(callback), next_time, Some(interval))
    }

    /// Runs `callback` on the next advance that is not already draining
    pub fn set_immediate<F>(&mut self, callback: F) -> TimerHandle
    where
        F: FnMut(&mut Scheduler) -> CallbackResult + 'static,
    {
        self.set_timeout(0, callback)
    }

    /// Cancels a one-shot timer. Has no effect on intervals or on timers
    /// that already fired.
    pub fn clear_timeout(&mut self, handle: TimerHandle) {
        self.cancel(handle, TimerKind::Timeout);
    }

    /// Cancels a repeating timer. Has no effect on one-shot timers.
    pub fn clear_interval(&mut self, handle: TimerHandle) {
        self.cancel(handle, TimerKind::Interval);
    }

    /// Stops the running drain once the current callback returns. Timers
    /// left unfired stay queued for the next advance.
    pub fn cancel_advance(&mut self) {
        if self.draining {
            self.stop_requested = true;
        }
    }

    /// Moves virtual time to the earliest due timer (if later than now) and
    /// fires every timer due by then. Returns the number of callbacks run.
    pub fn advance(&mut self) -> usize {
        self.begin_pass();
        let Some(earliest) = self.next_due() else {
            return 0;
        };
        self.run_pass(self.now.max(earliest))
    }

    /// Moves virtual time to at least `time` and fires every timer due by
    /// then, for hosts that track their own clock.
    pub fn advance_to(&mut self, time: u64) -> usize {
        self.begin_pass();
        if self.queue.is_empty() {
            self.now = self.now.max(time);
            return 0;
        }
        self.run_pass(self.now.max(time))
    }

    fn begin_pass(&mut self) {
        self.stop_requested = false;
        if self.draining {
            // a previous pass unwound before it could finish
            warn!("Detected incomplete scheduler pass, possibly from aborted execution");
            self.draining = false;
            self.apply_pending();
        }
    }

    fn run_pass(&mut self, time: u64) -> usize {
        self.now = time;
        debug!("Advancing virtual time to {}", self.now);

        self.draining = true;
        let mut fired = 0;

        while !self.stop_requested {
            match self.queue.first() {
                Some(entry) if entry.next_time <= self.now => {}
                _ => break,
            }
            let mut entry = self.queue.remove(0);

            if self.pending_cancels.contains(&(entry.handle, entry.kind())) {
                continue;
            }

            if let Err(err) = (entry.callback)(self) {
                error!("Timer {} callback failed: {}", entry.handle, err);
            }
            fired += 1;

            if let Some(interval) = entry.interval {
                entry.next_time = entry.next_time.saturating_add(interval);
                self.pending_inserts.push(entry);
            }
        }

        self.draining = false;
        self.apply_pending();
        fired
    }

    fn schedule(
        &mut self,
        callback: TimerCallback,
        next_time: u64,
        interval: Option<u64>,
    ) -> TimerHandle {
        let handle = TimerHandle::new(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);

        let entry = TimerEntry {
            handle,
            callback,
            next_time,
            interval,
        };
        if self.draining {
            self.pending_inserts.push(entry);
        } else {
            self.insert_sorted(entry);
        }
        handle
    }

    fn insert_sorted(&mut self, entry: TimerEntry) {
        let index = self
            .queue
            .iter()
            .position(|queued| entry.next_time < queued.next_time)
            .unwrap_or(self.queue.len());
        self.queue.insert(index, entry);
    }

    fn cancel(&mut self, handle: TimerHandle, kind: TimerKind) {
        if self.draining {
            self.pending_cancels.insert((handle, kind));
            return;
        }
        self.queue
            .retain(|entry| !(entry.handle == handle && entry.kind() == kind));
    }

    fn apply_pending(&mut self) {
        if !self.pending_cancels.is_empty() {
            let cancels = std::mem::take(&mut self.pending_cancels);
            let keep = |entry: &TimerEntry| !cancels.contains(&(entry.handle, entry.kind()));
            self.queue.retain(keep);
            self.pending_inserts.retain(keep);
        }
        for entry in std::mem::take(&mut self.pending_inserts) {
            self.insert_sorted(entry);
        }
    }
}
