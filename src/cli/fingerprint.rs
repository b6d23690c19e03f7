//! Show the SHA256 fingerprint of a public key file

use std::path::Path;

use colored::Colorize;

use crate::config::read_public_key;
use crate::error::Result;
use crate::ssh::PublicKeyLine;

pub fn run(path: &Path) -> Result<()> {
    let line = PublicKeyLine::parse(&read_public_key(path)?)?;

    let comment = if line.comment.is_empty() {
        "no comment".dimmed().to_string()
    } else {
        line.comment.clone()
    };

    println!("{} {} ({})", line.fingerprint().bold(), comment, line.algorithm.cyan());
    Ok(())
}
