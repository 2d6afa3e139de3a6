use thiserror::Error;

use tickboot_shared::{CallbackError, ManifestError};

use crate::sequencer::BootState;

/// A failure raised by the embedded runtime: during construction, while
/// resolving exports or from managed code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuntimeFault {
    message: String,
    stack: Option<String>,
}

impl RuntimeFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

impl From<RuntimeFault> for CallbackError {
    fn from(fault: RuntimeFault) -> Self {
        CallbackError::new(fault.message)
    }
}

/// Errors surfaced by the host-facing loader API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// The bundled manifest could not be decoded; nothing was started
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// A runtime fault recorded during an earlier tick, raised once
    #[error("Runtime fault: {0}")]
    Pending(RuntimeFault),

    /// The operation is not valid in the loader's current state
    #[error("Cannot {operation} while the loader is {state}")]
    InvalidState {
        operation: &'static str,
        state: BootState,
    },
}
