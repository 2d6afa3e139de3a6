/// Millisecond clock used for stage timings when no perf function is set
pub struct PerfClock;

impl PerfClock {
    /// Milliseconds since the UNIX epoch, as reported by the host
    pub fn now_ms() -> f64 {
        js_sys::Date::now()
    }
}
