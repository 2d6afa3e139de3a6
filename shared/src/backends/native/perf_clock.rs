use std::time::Instant;

use once_cell::sync::Lazy;

static PROCESS_START: Lazy<Instant> = Lazy::new(Instant::now);

/// Millisecond clock used for stage timings when no perf function is set
pub struct PerfClock;

impl PerfClock {
    /// Milliseconds elapsed since the clock was first read in this process
    pub fn now_ms() -> f64 {
        PROCESS_START.elapsed().as_secs_f64() * 1000.0
    }
}
