//! Debug events emitted while pointers run.
//!
//! Events are purely observational. They are only built when a callback is
//! installed and the [`DebugFilter`] admits the pointer.

use std::collections::BTreeSet;
use std::fmt;

use pota_core::{Position, StackSet};

use crate::pointer::PointerId;

/// Type alias for the debug callback, mirroring the VM's step hooks.
pub type DebugCallback = Option<Box<dyn FnMut(&DebugEvent)>>;

/// Which pointers produce debug events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DebugFilter {
    #[default]
    Off,
    All,
    Only(BTreeSet<u64>),
}

impl DebugFilter {
    pub fn admits(&self, id: PointerId) -> bool {
        match self {
            DebugFilter::Off => false,
            DebugFilter::All => true,
            DebugFilter::Only(ids) => ids.contains(&id.as_u64()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugEvent {
    Move {
        pointer: PointerId,
        position: Position,
    },
    EnterString {
        pointer: PointerId,
        position: Position,
        delimiter: char,
    },
    LeaveString {
        pointer: PointerId,
        position: Position,
        delimiter: char,
    },
    /// An instruction is about to run; `stacks` is a JSON rendering of the
    /// pointer's stack set before execution.
    Execute {
        pointer: PointerId,
        position: Position,
        instruction: char,
        stacks: String,
    },
}

impl fmt::Display for DebugEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugEvent::Move { pointer, position } => {
                write!(f, "[# Pointer {:>2} moving to {}#]", pointer.as_u64(), position)
            }
            DebugEvent::EnterString {
                pointer,
                position,
                delimiter,
            } => write!(
                f,
                "[# Pointer {:>2} in {} entering string mode {} #]",
                pointer.as_u64(),
                position,
                delimiter
            ),
            DebugEvent::LeaveString {
                pointer,
                position,
                delimiter,
            } => write!(
                f,
                "[# Pointer {:>2} in {} leaving string mode {} #]",
                pointer.as_u64(),
                position,
                delimiter
            ),
            DebugEvent::Execute {
                pointer,
                position,
                instruction,
                stacks,
            } => write!(
                f,
                "[# Pointer {:>2} in {} executing '{}' with stacks {} #]",
                pointer.as_u64(),
                position,
                instruction,
                stacks
            ),
        }
    }
}

/// Filter plus callback, owned by the interpreter.
#[derive(Default)]
pub(crate) struct Observer {
    pub(crate) filter: DebugFilter,
    pub(crate) callback: DebugCallback,
}

impl Observer {
    pub(crate) fn wants(&self, pointer: PointerId) -> bool {
        self.callback.is_some() && self.filter.admits(pointer)
    }

    pub(crate) fn emit(&mut self, event: DebugEvent) {
        if let Some(ref mut cb) = self.callback {
            cb(&event);
        }
    }
}

pub(crate) fn render_stacks(stacks: &StackSet) -> String {
    serde_json::to_string(stacks).unwrap_or_default()
}
