//! User-facing status lines
//!
//! Diagnostics meant for the person at the terminal, as opposed to log
//! records. Written to stderr with colored tags.

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const ORANGE: &str = "\x1b[38;2;255;165;0m";
const RESET: &str = "\x1b[0m";

pub fn error(message: &str) {
    eprintln!("{}ERROR{}: {}", RED, RESET, message);
}

pub fn hint(message: &str) {
    eprintln!("{}HINT{}: {}", GREEN, RESET, message);
}

pub fn warning(message: &str) {
    eprintln!("{}WARNING{}: {}", ORANGE, RESET, message);
}

pub fn info(message: &str) {
    eprintln!("INFO: {}", message);
}

/// Erase the current terminal line (the echoed ^C)
pub fn clear_line() {
    eprint!("\r\x1b[2K");
}
