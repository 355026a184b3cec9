//! Pota VM: pointers, instruction dispatch and the cooperative scheduler.

pub mod console;
pub mod debug;
mod dispatch;
pub mod pointer;
pub mod scheduler;

use pota_core::Fault;
use thiserror::Error;

pub use console::{BufferedConsole, Console, Input};
pub use debug::{DebugCallback, DebugEvent, DebugFilter};
pub use pointer::{Pointer, PointerId, StepOutcome};
pub use scheduler::{Interpreter, Pacing, RunOutcome};

#[derive(Debug, Error)]
pub enum VmError {
    #[error(transparent)]
    Fault(#[from] Fault),
    #[error("console i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("interrupted")]
    Interrupted,
}

impl VmError {
    /// The program fault behind this error, if any.
    pub fn as_fault(&self) -> Option<&Fault> {
        match self {
            VmError::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}
