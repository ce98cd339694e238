//! Output formatting utilities for the CLI.
//!
//! Standard output carries only machine-readable results; human-readable
//! messages go to standard error.

use anyhow::{Context, Result};
use serde::Serialize;

/// Print a value as compact JSON on standard output.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string(value).context("failed to serialize results")?;
    println!("{}", text);
    Ok(())
}

/// Print a success message.
pub fn success(msg: &str, quiet: bool) {
    if quiet {
        return;
    }

    use colored::Colorize;
    eprintln!("{} {}", "✓".green().bold(), msg);
}

/// Print an error and its causes.
pub fn error(err: &anyhow::Error) {
    use colored::Colorize;
    eprintln!("{} {:#}", "error:".red().bold(), err);
}
