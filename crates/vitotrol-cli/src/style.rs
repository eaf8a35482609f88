//! Visual styling utilities for the CLI.
//!
//! Spinners for the login and confirmation waits, and the one-line outcome
//! messages printed once an operation finished.

use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

// ============================================================================
// Progress Indicators
// ============================================================================

/// Standard spinner tick characters (Braille dots animation)
const SPINNER_TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Standard spinner tick interval
const SPINNER_TICK_MS: u64 = 80;

/// Get the standard spinner style.
fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_TICK_CHARS)
}

/// Create a spinner for generic operations.
///
/// Returns `None` when progress is disabled or stderr is not a terminal.
pub fn operation_spinner(message: &str, show_progress: bool) -> Option<ProgressBar> {
    if !show_progress || !io::stderr().is_terminal() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
    Some(pb)
}

// ============================================================================
// Outcome Messages
// ============================================================================

fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
}

/// Format a success line.
pub fn format_success(message: &str, color: bool) -> String {
    if color {
        format!("{} {}", "✓".green().bold(), message)
    } else {
        format!("OK {}", message)
    }
}

/// Format a pending line, used when a wait is skipped.
pub fn format_pending(message: &str, color: bool) -> String {
    if color {
        format!("{} {}", "…".yellow().bold(), message)
    } else {
        format!(".. {}", message)
    }
}

/// Print a success line to stdout.
pub fn print_success(message: &str) {
    println!("{}", format_success(message, use_color()));
}

/// Print a pending line to stdout.
pub fn print_pending(message: &str) {
    println!("{}", format_pending(message, use_color()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_success_plain() {
        assert_eq!(format_success("done", false), "OK done");
    }

    #[test]
    fn test_format_success_colored() {
        let line = format_success("done", true);
        assert!(line.contains("✓"));
        assert!(line.ends_with("done"));
    }

    #[test]
    fn test_format_pending_plain() {
        assert_eq!(format_pending("accepted", false), ".. accepted");
    }

    #[test]
    fn test_spinner_disabled() {
        assert!(operation_spinner("Waiting", false).is_none());
    }
}
