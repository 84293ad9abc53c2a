//! Terminal UI utilities

use colored::Colorize;
use zephyr_client::status::StatusSink;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a section header
pub fn header(text: &str) {
    println!("\n{}", text.bold().underline());
}

/// Print a key-value pair
pub fn key_value(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

/// Status sink that renders the two status channels onto the terminal.
pub struct ConsoleStatusSink;

impl StatusSink for ConsoleStatusSink {
    fn auth(&self, message: &str, is_error: bool) {
        let line = format!("{} {}", "[auth]".dimmed(), message);
        if is_error {
            error(&line);
        } else {
            info(&line);
        }
    }

    fn payment(&self, message: &str, is_error: bool) {
        let line = format!("{} {}", "[payment]".dimmed(), message);
        if is_error {
            error(&line);
        } else {
            info(&line);
        }
    }

    fn network(&self, label: &str) {
        key_value("network", label);
    }
}
