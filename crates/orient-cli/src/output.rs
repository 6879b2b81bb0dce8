//! Output helpers shared by all commands.
//!
//! JSON mode writes exactly one document to stdout, so status messages are
//! only printed in text mode.

use colored::Colorize;
use serde::Serialize;

use crate::OutputFormat;

/// Print a serializable report.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{}: failed to serialize output: {}", "Error".red().bold(), e),
        },
        // Text reports are printed by each command.
        OutputFormat::Text => {}
    }
}

/// Print a progress/status message.
pub fn info(message: &str, format: OutputFormat, quiet: bool) {
    if quiet || matches!(format, OutputFormat::Json) {
        return;
    }
    println!("{} {}", "→".blue(), message);
}

/// Print a success message.
pub fn success(message: &str, format: OutputFormat, quiet: bool) {
    if quiet || matches!(format, OutputFormat::Json) {
        return;
    }
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning to stderr.
pub fn warn(message: &str, quiet: bool) {
    if quiet {
        return;
    }
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}

/// Format a vector as `(x, y, z)`.
pub fn vec3(v: [f64; 3]) -> String {
    format!("({:.4}, {:.4}, {:.4})", v[0], v[1], v[2])
}
