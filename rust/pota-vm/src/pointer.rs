//! Pointer state machine: movement, wrap-around and instruction fetch.
//!
//! A pointer alternates between two kinds of step. With instructions
//! pending it executes the front one; with none pending it moves one cell,
//! wraps at the edge of the current row or column and enqueues the cell it
//! landed on.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use pota_core::grid::BLANK;
use pota_core::{Direction, Fault, Grid, Position, Stack, StackSet, Value};
use rand::rngs::StdRng;

use crate::console::Console;
use crate::debug::{render_stacks, DebugEvent, Observer};
use crate::VmError;

/// Characters that open string mode.
const STRING_DELIMITERS: [char; 2] = ['"', '\''];

/// Unique, never reused pointer identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(u64);

impl PointerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointerId({})", self.0)
    }
}

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ptr:{}", self.0)
    }
}

/// What a step left the pointer able to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Can keep running in the same round.
    Runnable,
    /// Its next action is a `#` retry.
    Blocked,
    /// It executed `;`.
    Dead,
}

/// Everything a step may touch besides the pointer itself.
pub(crate) struct StepContext<'a> {
    pub(crate) grid: &'a mut Grid,
    /// Live pointers other than the one stepping.
    pub(crate) others: &'a mut BTreeMap<PointerId, Pointer>,
    /// Pointers spawned this round, admitted at the start of the next.
    pub(crate) spawned: &'a mut Vec<Pointer>,
    pub(crate) next_id: &'a mut u64,
    pub(crate) console: &'a mut dyn Console,
    pub(crate) rng: &'a mut StdRng,
    pub(crate) observer: &'a mut Observer,
}

impl StepContext<'_> {
    pub(crate) fn allocate_id(&mut self) -> PointerId {
        let id = PointerId(*self.next_id);
        *self.next_id += 1;
        id
    }

    /// Append `value` to the mailbox of `target`; `false` if no such pointer.
    pub(crate) fn deliver(&mut self, target: PointerId, value: Value) -> bool {
        if let Some(pointer) = self.others.get_mut(&target) {
            pointer.mailbox.push_back(value);
            return true;
        }
        if let Some(pointer) = self.spawned.iter_mut().find(|p| p.id == target) {
            pointer.mailbox.push_back(value);
            return true;
        }
        false
    }
}

#[derive(Debug, Clone)]
pub struct Pointer {
    pub(crate) id: PointerId,
    pub(crate) position: Position,
    pub(crate) direction: Direction,
    pub(crate) stacks: StackSet,
    /// Delimiter that will close the active string, if any.
    pub(crate) string_mode: Option<char>,
    pub(crate) pending: VecDeque<char>,
    pub(crate) mailbox: VecDeque<Value>,
    pub(crate) skip: bool,
    pub(crate) alive: bool,
}

impl Pointer {
    /// Create a pointer at `position` with the cell under it already queued.
    pub fn new(
        id: PointerId,
        stack: Stack,
        position: Position,
        direction: Direction,
        grid: &Grid,
    ) -> Self {
        Self {
            id,
            position,
            direction,
            stacks: StackSet::new(stack),
            string_mode: None,
            pending: VecDeque::from([grid.get(position.x, position.y)]),
            mailbox: VecDeque::new(),
            skip: false,
            alive: true,
        }
    }

    pub fn id(&self) -> PointerId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn stacks(&self) -> &StackSet {
        &self.stacks
    }

    pub fn string_mode(&self) -> Option<char> {
        self.string_mode
    }

    pub fn pending(&self) -> impl Iterator<Item = char> + '_ {
        self.pending.iter().copied()
    }

    pub fn mailbox_len(&self) -> usize {
        self.mailbox.len()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.stacks.push(value);
    }

    pub(crate) fn pop(&mut self) -> Result<Value, VmError> {
        Ok(self.stacks.pop()?)
    }

    pub(crate) fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<StepOutcome, VmError> {
        match self.pending.pop_front() {
            Some(instruction) => self.execute(instruction, ctx)?,
            None => self.advance(ctx),
        }
        Ok(self.outcome())
    }

    fn outcome(&self) -> StepOutcome {
        if !self.alive {
            StepOutcome::Dead
        } else if self.next_is_wait_retry() {
            StepOutcome::Blocked
        } else {
            StepOutcome::Runnable
        }
    }

    /// The next step would execute `#` against an empty mailbox.
    fn next_is_wait_retry(&self) -> bool {
        self.pending.front() == Some(&'#')
            && !self.skip
            && self.string_mode.is_none()
            && self.mailbox.is_empty()
    }

    fn advance(&mut self, ctx: &mut StepContext<'_>) {
        let (position, wrapped) = wrap(ctx.grid, self.position.step(self.direction), self.direction);
        // Crossing an edge cancels a pending skip.
        if wrapped {
            self.skip = false;
        }
        self.position = position;
        if ctx.observer.wants(self.id) {
            ctx.observer.emit(DebugEvent::Move {
                pointer: self.id,
                position,
            });
        }
        if self.skip {
            self.skip = false;
        } else {
            self.pending.push_back(ctx.grid.get(position.x, position.y));
        }
    }

    fn execute(&mut self, instruction: char, ctx: &mut StepContext<'_>) -> Result<(), VmError> {
        if self.skip {
            self.skip = false;
            return Ok(());
        }
        match self.string_mode {
            None if STRING_DELIMITERS.contains(&instruction) => {
                self.trace_string(ctx, instruction, true);
                self.string_mode = Some(instruction);
                self.push(Value::text(""));
            }
            Some(delimiter) if delimiter == instruction => {
                self.trace_string(ctx, delimiter, false);
                self.string_mode = None;
            }
            Some(_) => {
                let top = self
                    .stacks
                    .active_mut()
                    .top_mut()
                    .ok_or(Fault::EmptyStack)?;
                let mut text = std::mem::replace(top, Value::text("")).into_text();
                text.push(instruction);
                *top = Value::Text(text);
            }
            None if instruction == BLANK => {}
            None => {
                if ctx.observer.wants(self.id) {
                    ctx.observer.emit(DebugEvent::Execute {
                        pointer: self.id,
                        position: self.position,
                        instruction,
                        stacks: render_stacks(&self.stacks),
                    });
                }
                self.dispatch(instruction, ctx)?;
            }
        }
        Ok(())
    }

    fn trace_string(&self, ctx: &mut StepContext<'_>, delimiter: char, entering: bool) {
        if !ctx.observer.wants(self.id) {
            return;
        }
        let (pointer, position) = (self.id, self.position);
        ctx.observer.emit(if entering {
            DebugEvent::EnterString {
                pointer,
                position,
                delimiter,
            }
        } else {
            DebugEvent::LeaveString {
                pointer,
                position,
                delimiter,
            }
        });
    }
}

/// Correct a freshly stepped position for toroidal movement.
///
/// Vertical wrap uses the bottom of the current column, horizontal wrap the
/// right end of the (possibly corrected) row. Returns whether a wrap
/// happened.
pub(crate) fn wrap(grid: &Grid, mut position: Position, direction: Direction) -> (Position, bool) {
    let (dx, dy) = direction.delta();
    let mut wrapped = false;
    if dy < 0 && position.y < 0 {
        position.y = grid.column_bound(position.x);
        wrapped = true;
    } else if dy > 0 && position.y > grid.column_bound(position.x) {
        position.y = 0;
        wrapped = true;
    }
    if dx < 0 && position.x < 0 {
        position.x = grid.row_bound(position.y);
        wrapped = true;
    } else if dx > 0 && position.x > grid.row_bound(position.y) {
        position.x = 0;
        wrapped = true;
    }
    (position, wrapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_on_empty_grid_returns_to_origin() {
        let grid = Grid::new();
        for direction in Direction::ALL {
            let (p, wrapped) = wrap(&grid, Position::default().step(direction), direction);
            assert_eq!(p, Position::default());
            assert!(wrapped);
        }
    }

    #[test]
    fn test_wrap_uses_row_and_column_bounds() {
        let grid = Grid::parse("abcd\nx\nyz");
        let (p, _) = wrap(&grid, Position::new(2, 1), Direction::Right);
        assert_eq!(p, Position::new(0, 1));
        let (p, _) = wrap(&grid, Position::new(-1, 2), Direction::Left);
        assert_eq!(p, Position::new(1, 2));
        let (p, _) = wrap(&grid, Position::new(3, -1), Direction::Up);
        assert_eq!(p, Position::new(3, 0));
        let (p, _) = wrap(&grid, Position::new(1, 3), Direction::Down);
        assert_eq!(p, Position::new(1, 0));
        let (p, wrapped) = wrap(&grid, Position::new(1, 2), Direction::Down);
        assert_eq!(p, Position::new(1, 2));
        assert!(!wrapped);
    }

    #[test]
    fn test_new_pointer_queues_its_cell() {
        let grid = Grid::parse("7");
        let p = Pointer::new(
            PointerId::new(0),
            Stack::new(),
            Position::default(),
            Direction::Right,
            &grid,
        );
        assert_eq!(p.pending().collect::<Vec<_>>(), vec!['7']);
        assert!(p.is_alive());
    }

    #[test]
    fn test_queued_wait_blocks_only_on_empty_mailbox() {
        let grid = Grid::parse("#");
        let mut p = Pointer::new(
            PointerId::new(0),
            Stack::new(),
            Position::default(),
            Direction::Right,
            &grid,
        );
        assert_eq!(p.outcome(), StepOutcome::Blocked);
        p.mailbox.push_back(Value::text("m"));
        assert_eq!(p.outcome(), StepOutcome::Runnable);
        p.mailbox.clear();
        p.skip = true;
        assert_eq!(p.outcome(), StepOutcome::Runnable);
        p.skip = false;
        p.string_mode = Some('"');
        assert_eq!(p.outcome(), StepOutcome::Runnable);
    }
}
