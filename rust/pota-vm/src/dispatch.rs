//! Instruction table.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use pota_core::value::{floor_div_mod, to_code_point, to_coordinate, to_count};
use pota_core::{Direction, Fault, Position, Value};
use rand::seq::SliceRandom;
use tracing::debug;

use crate::console::Input;
use crate::pointer::{wrap, Pointer, PointerId, StepContext};
use crate::VmError;

/// Shown on the console when interactive input is interrupted.
const INTERRUPT_MARKER: &str = "^C\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
}

impl Pointer {
    pub(crate) fn dispatch(
        &mut self,
        instruction: char,
        ctx: &mut StepContext<'_>,
    ) -> Result<(), VmError> {
        if let Some(direction) = Direction::from_arrow(instruction) {
            self.direction = direction;
            return Ok(());
        }
        if let Some(direction) = self.direction.reflect(instruction) {
            self.direction = direction;
            return Ok(());
        }
        match instruction {
            'x' => {
                self.direction = Direction::ALL
                    .choose(&mut *ctx.rng)
                    .copied()
                    .unwrap_or(self.direction);
            }
            '!' => self.skip = true,
            '?' => self.skip = self.pop()?.is_nonzero_text(),
            'w' => {
                self.push(Value::from(self.position.x));
                self.push(Value::from(self.position.y));
            }
            'j' => {
                let y = self.pop()?.to_int()?;
                let x = self.pop()?.to_int()?;
                if x.is_negative() || y.is_negative() {
                    return Err(Fault::NegativeJump { x, y }.into());
                }
                self.position = Position::new(to_coordinate(&x)?, to_coordinate(&y)?);
            }
            '0'..='9' => self.push(Value::from_char(instruction)),
            '+' => self.arithmetic(BinaryOp::Add)?,
            '-' => self.arithmetic(BinaryOp::Sub)?,
            '*' => self.arithmetic(BinaryOp::Mul)?,
            '%' => {
                let x = self.pop()?;
                let y = self.pop()?;
                let (quotient, remainder) = floor_div_mod(&y.to_int()?, &x.to_int()?)?;
                self.push(Value::Int(quotient));
                self.push(Value::Int(remainder));
            }
            '.' => {
                let x = self.pop()?;
                let y = self.pop()?;
                let mut joined = y.into_text();
                joined.push_str(&x.to_text());
                self.push(Value::Text(joined));
            }
            '=' => self.compare_text(|ord| ord == Ordering::Equal)?,
            '(' => self.compare_text(|ord| ord == Ordering::Less)?,
            ')' => self.compare_text(|ord| ord == Ordering::Greater)?,
            '[' => self.compare_int(|ord| ord == Ordering::Less)?,
            ']' => self.compare_int(|ord| ord == Ordering::Greater)?,
            ',' => {
                let x = self.pop()?;
                self.push(x.clone());
                self.push(x);
            }
            '~' => {
                self.pop()?;
            }
            '$' => {
                let x = self.pop()?;
                let y = self.pop()?;
                self.push(x);
                self.push(y);
            }
            'c' => {
                let code = self.pop()?.to_int()?;
                self.push(Value::from_char(to_code_point(&code)?));
            }
            'a' => {
                let ch = self.pop()?.to_char()?;
                self.push(Value::int(u32::from(ch)));
            }
            ':' => self.stacks.collapse_active(),
            '{' => self.stacks.active_mut().rotate_left(),
            '}' => self.stacks.active_mut().rotate_right(),
            'r' => self.stacks.active_mut().reverse(),
            'e' => {
                let text = self.pop()?.into_text();
                self.stacks
                    .push_stack(text.chars().map(Value::from_char).collect());
            }
            'n' => {
                let count = to_count(&self.pop()?.to_int()?);
                let stack = self.stacks.active_mut().pop_many(count)?;
                self.stacks.push_stack(stack);
            }
            'm' => self.stacks.merge_active(),
            'd' => self.stacks.duplicate_active(),
            'l' => {
                let len = self.stacks.active().len();
                self.push(Value::int(len));
            }
            '`' => {
                let code = self.pop()?.into_text();
                for ch in code.chars().rev() {
                    self.pending.push_front(ch);
                }
            }
            'g' => {
                let y = to_coordinate(&self.pop()?.to_int()?)?;
                let x = to_coordinate(&self.pop()?.to_int()?)?;
                self.push(Value::from_char(ctx.grid.get(x, y)));
            }
            // A cell holds one character. Longer text is rejected rather than
            // stored whole and queued character by character on fetch.
            'p' => {
                let y = to_coordinate(&self.pop()?.to_int()?)?;
                let x = to_coordinate(&self.pop()?.to_int()?)?;
                let ch = self.pop()?.to_char()?;
                ctx.grid.set(x, y, ch);
            }
            '&' => self.spawn(ctx)?,
            '#' => match self.mailbox.pop_front() {
                Some(message) => self.push(message),
                None => self.pending.push_front('#'),
            },
            '@' => {
                let target = self.pop()?.to_int()?;
                let message = self.pop()?;
                self.send(ctx, target, message)?;
            }
            'y' => self.push(Value::int(self.id.as_u64())),
            'i' => match ctx.console.read_char()? {
                Input::Char(ch) => self.push(Value::from_char(ch)),
                Input::Eof => self.push(Value::text("")),
                Input::Interrupted => {
                    ctx.console.write_text(INTERRUPT_MARKER)?;
                    return Err(VmError::Interrupted);
                }
            },
            'o' => {
                let text = self.pop()?.into_text();
                ctx.console.write_text(&text)?;
            }
            ';' => self.alive = false,
            other => return Err(Fault::InvalidInstruction(other).into()),
        }
        Ok(())
    }

    fn arithmetic(&mut self, op: BinaryOp) -> Result<(), VmError> {
        let x = self.pop()?;
        let y = self.pop()?;
        let (y, x) = (y.to_int()?, x.to_int()?);
        let result = match op {
            BinaryOp::Add => y + x,
            BinaryOp::Sub => y - x,
            BinaryOp::Mul => y * x,
        };
        self.push(Value::Int(result));
        Ok(())
    }

    fn compare_text(&mut self, accept: impl Fn(Ordering) -> bool) -> Result<(), VmError> {
        let x = self.pop()?;
        let y = self.pop()?;
        let verdict = accept(y.to_text().cmp(&x.to_text()));
        self.push(truth(verdict));
        Ok(())
    }

    fn compare_int(&mut self, accept: impl Fn(Ordering) -> bool) -> Result<(), VmError> {
        let x = self.pop()?;
        let y = self.pop()?;
        let verdict = accept(y.to_int()?.cmp(&x.to_int()?));
        self.push(truth(verdict));
        Ok(())
    }

    fn spawn(&mut self, ctx: &mut StepContext<'_>) -> Result<(), VmError> {
        let count = to_count(&self.pop()?.to_int()?);
        let stack = self.stacks.active_mut().pop_many(count)?;
        let (position, _) = wrap(ctx.grid, self.position.step(self.direction), self.direction);
        let id = ctx.allocate_id();
        debug!(parent = %self.id, child = %id, x = position.x, y = position.y, "spawned pointer");
        let child = Pointer::new(id, stack, position, self.direction, ctx.grid);
        ctx.spawned.push(child);
        Ok(())
    }

    fn send(
        &mut self,
        ctx: &mut StepContext<'_>,
        target: BigInt,
        message: Value,
    ) -> Result<(), VmError> {
        let Some(id) = target.to_u64().map(PointerId::new) else {
            return Err(Fault::UnknownPointer(target).into());
        };
        if id == self.id {
            self.mailbox.push_back(message);
            return Ok(());
        }
        if ctx.deliver(id, message) {
            Ok(())
        } else {
            Err(Fault::UnknownPointer(target).into())
        }
    }
}

fn truth(verdict: bool) -> Value {
    Value::text(if verdict { "1" } else { "0" })
}
