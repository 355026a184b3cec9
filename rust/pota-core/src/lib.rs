//! Pota Core
//!
//! Shared data model for the Pota interpreter: the program grid, values,
//! stacks, movement geometry and the fault taxonomy.

pub mod fault;
pub mod geometry;
pub mod grid;
pub mod stack;
pub mod value;

pub use fault::{Fault, FaultKind};
pub use geometry::{Direction, Position};
pub use grid::Grid;
pub use stack::{Stack, StackSet};
pub use value::Value;
