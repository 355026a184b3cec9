//! ANSI styling for diagnostics on stderr.

const RESET: &str = "\x1b[0m";

fn paint(code: &str, s: &str) -> String {
    format!("\x1b[{}m{}{}", code, s, RESET)
}

/// Bold red `error:` label.
pub fn error_label() -> String {
    paint("1;31", "error:")
}

/// Bold yellow `warning:` label.
pub fn warning_label() -> String {
    paint("1;33", "warning:")
}
