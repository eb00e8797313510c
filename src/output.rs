//! User-facing messages.
//!
//! Status lines (`info:`, `ok:`) go to stdout, problems (`warn:`, `error:`) to
//! stderr. Each stream is colored only when it is a TTY.

use owo_colors::{OwoColorize, Style};

pub fn stdout_is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn stderr_is_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

fn tag(label: &str, style: Style, tty: bool) -> String {
    if tty {
        label.style(style).to_string()
    } else {
        label.to_string()
    }
}

pub fn print_info(msg: &str) {
    println!("{} {}", tag("info:", Style::new().cyan().bold(), stdout_is_tty()), msg);
}

pub fn print_success(msg: &str) {
    println!("{} {}", tag("ok:", Style::new().green().bold(), stdout_is_tty()), msg);
}

pub fn print_warn(msg: &str) {
    eprintln!("{} {}", tag("warn:", Style::new().yellow().bold(), stderr_is_tty()), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", tag("error:", Style::new().red().bold(), stderr_is_tty()), msg);
}

/// Print a plain line (no prefix). Command results go through here so
/// scripts can consume them.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_tag_without_tty() {
        assert_eq!(tag("ok:", Style::new().green(), false), "ok:");
        assert!(tag("ok:", Style::new().green(), true).contains("ok:"));
    }
}
