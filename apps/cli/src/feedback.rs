//! # User Feedback
//!
//! The only place in the workspace that prints notices. Library layers build
//! [`Notice`] values; this module renders them.

use std::io::{self, BufRead, Write};

use tillbox_core::{Notice, Severity};

/// Prints a notice with its severity tag.
///
/// Success and info go to stdout; warnings and errors go to stderr so
/// scripted callers can separate them.
pub fn emit(notice: &Notice) {
    let line = format!("[{}] {}", notice.severity, notice.message);
    match notice.severity {
        Severity::Success | Severity::Info => println!("{line}"),
        Severity::Warning | Severity::Error => eprintln!("{line}"),
    }
}

/// Asks for confirmation unless `assume_yes` is set.
///
/// Reads one line from stdin and accepts `y` / `yes` (case-insensitive).
pub fn confirm(prompt: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    print!("{prompt} [y/N]: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
