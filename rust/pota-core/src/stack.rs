//! Operand stacks and the per-pointer stack of stacks.

use std::collections::VecDeque;

use serde::Serialize;

use crate::fault::Fault;
use crate::value::Value;

/// A double-ended operand stack; the back is the top.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Stack {
    items: VecDeque<Value>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value) {
        self.items.push_back(value);
    }

    pub fn pop(&mut self) -> Result<Value, Fault> {
        self.items.pop_back().ok_or(Fault::EmptyStack)
    }

    /// Pop `count` values, returned bottom-first (in stack order).
    pub fn pop_many(&mut self, count: usize) -> Result<Stack, Fault> {
        if count > self.items.len() {
            return Err(Fault::EmptyStack);
        }
        let items = self.items.split_off(self.items.len() - count);
        Ok(Stack { items })
    }

    /// Move the bottom element to the top.
    pub fn rotate_left(&mut self) {
        if !self.items.is_empty() {
            self.items.rotate_left(1);
        }
    }

    /// Move the top element to the bottom.
    pub fn rotate_right(&mut self) {
        if !self.items.is_empty() {
            self.items.rotate_right(1);
        }
    }

    pub fn reverse(&mut self) {
        self.items.make_contiguous().reverse();
    }

    /// Text forms of every element joined bottom to top.
    pub fn concat_text(&self) -> String {
        self.items.iter().map(Value::to_text).collect()
    }

    pub fn append(&mut self, mut other: Stack) {
        self.items.append(&mut other.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub fn top_mut(&mut self) -> Option<&mut Value> {
        self.items.back_mut()
    }
}

impl FromIterator<Value> for Stack {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Stack {
            items: iter.into_iter().collect(),
        }
    }
}

/// Ordered sequence of stacks; the last one is active. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StackSet {
    stacks: Vec<Stack>,
}

impl Default for StackSet {
    fn default() -> Self {
        Self::new(Stack::new())
    }
}

impl StackSet {
    pub fn new(initial: Stack) -> Self {
        Self {
            stacks: vec![initial],
        }
    }

    pub fn active(&self) -> &Stack {
        &self.stacks[self.stacks.len() - 1]
    }

    pub fn active_mut(&mut self) -> &mut Stack {
        let top = self.stacks.len() - 1;
        &mut self.stacks[top]
    }

    pub fn push(&mut self, value: Value) {
        self.active_mut().push(value);
    }

    pub fn pop(&mut self) -> Result<Value, Fault> {
        self.active_mut().pop()
    }

    pub fn push_stack(&mut self, stack: Stack) {
        self.stacks.push(stack);
    }

    /// Replace the active stack with a single text element holding the
    /// concatenation of all its elements.
    pub fn collapse_active(&mut self) {
        let joined = self.active().concat_text();
        *self.active_mut() = Stack::from_iter([Value::Text(joined)]);
    }

    /// Pop the active stack and append its elements onto the one below;
    /// a lone stack is replaced by an empty one.
    pub fn merge_active(&mut self) {
        let popped = self.stacks.pop().unwrap_or_default();
        match self.stacks.last_mut() {
            Some(below) => below.append(popped),
            None => self.stacks.push(Stack::new()),
        }
    }

    pub fn duplicate_active(&mut self) {
        let copy = self.active().clone();
        self.stacks.push(copy);
    }

    pub fn depth(&self) -> usize {
        self.stacks.len()
    }

    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }
}
