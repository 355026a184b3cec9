//! Console boundary between the interpreter and the outside world.
//!
//! The VM never touches stdin/stdout directly. The CLI provides a terminal
//! implementation; [`BufferedConsole`] is a scripted in-memory console for
//! tests and benchmarks.

use std::collections::VecDeque;
use std::io;

/// Result of reading one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Char(char),
    /// The input stream is exhausted.
    Eof,
    /// The user asked to stop (Ctrl-C during an interactive read).
    Interrupted,
}

pub trait Console {
    fn read_char(&mut self) -> io::Result<Input>;

    /// Emit text immediately; implementations must not buffer.
    fn write_text(&mut self, text: &str) -> io::Result<()>;

    /// Block until the user cues the next paced round.
    fn wait_for_cue(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct BufferedConsole {
    input: VecDeque<char>,
    output: String,
    interrupt_when_exhausted: bool,
    cues: usize,
}

impl BufferedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            ..Self::default()
        }
    }

    /// Report an interrupt instead of end-of-input once the scripted input
    /// runs out.
    pub fn interrupt_when_exhausted(mut self) -> Self {
        self.interrupt_when_exhausted = true;
        self
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn cues(&self) -> usize {
        self.cues
    }
}

impl Console for BufferedConsole {
    fn read_char(&mut self) -> io::Result<Input> {
        Ok(match self.input.pop_front() {
            Some(ch) => Input::Char(ch),
            None if self.interrupt_when_exhausted => Input::Interrupted,
            None => Input::Eof,
        })
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn wait_for_cue(&mut self) -> io::Result<()> {
        self.cues += 1;
        Ok(())
    }
}
