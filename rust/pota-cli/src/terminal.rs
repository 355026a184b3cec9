//! Terminal console: unbuffered stdout, single-key stdin.
//!
//! When stdin is a terminal each read switches it to raw mode for exactly
//! one key press, so Ctrl-C arrives as a key rather than a signal. Piped
//! input is decoded one UTF-8 character at a time.

use std::io::{self, BufRead, IsTerminal, Read, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use pota_vm::{Console, Input};

pub struct TerminalConsole {
    interactive: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn read_char(&mut self) -> io::Result<Input> {
        if self.interactive {
            read_key()
        } else {
            read_utf8_char(&mut io::stdin().lock())
        }
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    /// Wait for Enter.
    fn wait_for_cue(&mut self) -> io::Result<()> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(())
    }
}

/// Restores cooked mode when dropped.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn read_key() -> io::Result<Input> {
    let _raw = RawMode::enable()?;
    loop {
        if let Event::Key(key) = event::read()? {
            if let Some(input) = key_input(key) {
                return Ok(input);
            }
        }
    }
}

/// Map a key press to what a raw terminal read would have produced.
fn key_input(key: KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ch = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Input::Interrupted)
        }
        KeyCode::Char(ch) => ch,
        KeyCode::Enter => '\r',
        KeyCode::Tab => '\t',
        KeyCode::Backspace => '\u{7f}',
        KeyCode::Esc => '\u{1b}',
        _ => return None,
    };
    Some(Input::Char(ch))
}

/// Read one UTF-8 encoded character; malformed bytes decode to U+FFFD.
pub fn read_utf8_char(reader: &mut impl Read) -> io::Result<Input> {
    let mut buf = [0u8; 4];
    match reader.read_exact(&mut buf[..1]) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(Input::Eof),
        Err(e) => return Err(e),
    }
    let width = utf8_width(buf[0]);
    if width > 1 {
        match reader.read_exact(&mut buf[1..width]) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Ok(Input::Char(char::REPLACEMENT_CHARACTER))
            }
            Err(e) => return Err(e),
        }
    }
    let ch = std::str::from_utf8(&buf[..width])
        .ok()
        .and_then(|s| s.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    Ok(Input::Char(ch))
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_ascii_then_eof() {
        let mut input = Cursor::new("a".as_bytes());
        assert_eq!(read_utf8_char(&mut input).unwrap(), Input::Char('a'));
        assert_eq!(read_utf8_char(&mut input).unwrap(), Input::Eof);
    }

    #[test]
    fn reads_multibyte_characters_whole() {
        let mut input = Cursor::new("é€".as_bytes());
        assert_eq!(read_utf8_char(&mut input).unwrap(), Input::Char('é'));
        assert_eq!(read_utf8_char(&mut input).unwrap(), Input::Char('€'));
    }

    #[test]
    fn malformed_bytes_become_replacement_character() {
        let mut input = Cursor::new(vec![0xFFu8, b'x']);
        assert_eq!(
            read_utf8_char(&mut input).unwrap(),
            Input::Char(char::REPLACEMENT_CHARACTER)
        );
        assert_eq!(read_utf8_char(&mut input).unwrap(), Input::Char('x'));
    }

    #[test]
    fn truncated_sequence_at_end() {
        let mut input = Cursor::new(vec![0xE2u8, 0x82]);
        assert_eq!(
            read_utf8_char(&mut input).unwrap(),
            Input::Char(char::REPLACEMENT_CHARACTER)
        );
    }

    #[test]
    fn ctrl_c_key_interrupts() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_input(key), Some(Input::Interrupted));
    }

    #[test]
    fn keys_map_to_raw_characters() {
        let plain = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(key_input(plain), Some(Input::Char('c')));
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(key_input(enter), Some(Input::Char('\r')));
        let arrow = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(key_input(arrow), None);
    }
}
