use std::{cell::Cell, rc::Rc};

/// Marks that startup must not continue during the current host tick.
///
/// The runtime raises it from its pre-run phase; the host releases it at the
/// start of the next tick. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct TickBarrier {
    raised: Rc<Cell<bool>>,
    times_raised: Rc<Cell<u32>>,
}

impl TickBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        if !self.raised.replace(true) {
            self.times_raised.set(self.times_raised.get() + 1);
        }
    }

    /// Lowers the barrier, returning whether it was raised
    pub fn release(&self) -> bool {
        self.raised.replace(false)
    }

    pub fn is_raised(&self) -> bool {
        self.raised.get()
    }

    /// How many times the barrier has gone up
    pub fn times_raised(&self) -> u32 {
        self.times_raised.get()
    }
}
