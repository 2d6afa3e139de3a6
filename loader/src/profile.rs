use std::rc::Rc;

use tickboot_shared::{Console, PerfClock};

pub type PerfFn = Rc<dyn Fn() -> f64>;

/// Times startup stages with the host's perf function, logging the result
/// when verbose logging is on.
#[derive(Clone)]
pub struct StageTimer {
    perf_fn: PerfFn,
    verbose: bool,
}

impl Default for StageTimer {
    fn default() -> Self {
        Self {
            perf_fn: Rc::new(PerfClock::now_ms),
            verbose: false,
        }
    }
}

impl StageTimer {
    pub fn set_perf_fn(&mut self, perf_fn: PerfFn) {
        self.perf_fn = perf_fn;
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn now(&self) -> f64 {
        (self.perf_fn)()
    }

    pub fn measure<T>(&self, console: &Console, stage: &str, work: impl FnOnce() -> T) -> T {
        if !self.verbose {
            return work();
        }
        let start = self.now();
        let result = work();
        let elapsed = self.now() - start;
        console.log(format_args!("{} in {:.2} ms", stage, elapsed));
        result
    }
}
