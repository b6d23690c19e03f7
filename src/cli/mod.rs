//! CLI subcommands

pub mod authorize;
pub mod fingerprint;
pub mod generate;
pub mod inspect;
pub mod list;
pub mod probe;

use std::io::{self, Write};

use crate::error::Result;

/// Ask a yes/no question, defaulting to no
pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Async runtime for the key generation subcommands
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Runtime::new()?)
}
