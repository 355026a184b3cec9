//! Fault taxonomy for the Pota interpreter.
//!
//! Every fault is fatal to the whole run. Faults are the expected outcome of
//! a malformed program, so the messages keep the wording users see on the
//! diagnostic stream.

use num_bigint::BigInt;
use strum::{Display, IntoStaticStr};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("Tried to pop from empty stack")]
    EmptyStack,
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Cannot convert to integer: {0:?}")]
    NotAnInteger(String),
    #[error("Expected a single char, got {0:?}")]
    NotSingleChar(String),
    #[error("Jump to negative position ({x}, {y})")]
    NegativeJump { x: BigInt, y: BigInt },
    #[error("Pointer {0} does not exist")]
    UnknownPointer(BigInt),
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(char),
}

/// Discriminant of a [`Fault`], used for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FaultKind {
    EmptyStack,
    DivisionByZero,
    NotAnInteger,
    NotSingleChar,
    NegativeJump,
    UnknownPointer,
    InvalidInstruction,
}

impl Fault {
    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::EmptyStack => FaultKind::EmptyStack,
            Fault::DivisionByZero => FaultKind::DivisionByZero,
            Fault::NotAnInteger(_) => FaultKind::NotAnInteger,
            Fault::NotSingleChar(_) => FaultKind::NotSingleChar,
            Fault::NegativeJump { .. } => FaultKind::NegativeJump,
            Fault::UnknownPointer(_) => FaultKind::UnknownPointer,
            Fault::InvalidInstruction(_) => FaultKind::InvalidInstruction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_diagnostic_wording() {
        assert_eq!(Fault::EmptyStack.to_string(), "Tried to pop from empty stack");
        assert_eq!(Fault::DivisionByZero.to_string(), "Division by zero");
        assert_eq!(
            Fault::UnknownPointer(BigInt::from(7)).to_string(),
            "Pointer 7 does not exist"
        );
        assert_eq!(
            Fault::InvalidInstruction('Q').to_string(),
            "Invalid instruction: Q"
        );
    }

    #[test]
    fn test_kind_names_are_snake_case() {
        let kind: &'static str = Fault::NotSingleChar("ab".into()).kind().into();
        assert_eq!(kind, "not_single_char");
        assert_eq!(
            Fault::NegativeJump {
                x: BigInt::from(-1),
                y: BigInt::from(0)
            }
            .kind()
            .to_string(),
            "negative_jump"
        );
    }
}
