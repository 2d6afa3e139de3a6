//! Cooperative, single-threaded timer scheduling over virtual time.

mod error;
mod timer;
mod timer_queue;

pub use error::CallbackError;
pub use timer::{TimerCallback, TimerHandle, TimerKind};
pub use timer_queue::Scheduler;

pub type CallbackResult = Result<(), CallbackError>;
