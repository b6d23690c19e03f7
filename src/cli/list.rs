//! List managed entries in authorized_keys

use std::path::PathBuf;

use colored::Colorize;

use crate::config;
use crate::error::Result;

pub fn run(ssh_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let ssh_dir = match ssh_dir {
        Some(dir) => dir,
        None => config::default_ssh_dir()?,
    };

    let keys = config::list_keys(&ssh_dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&keys)?);
        return Ok(());
    }

    if keys.is_empty() {
        println!("No managed keys in {}", config::authorized_keys_path(&ssh_dir).display());
        return Ok(());
    }

    println!("{}", "Managed keys:".cyan().bold());
    println!();
    for (i, key) in keys.iter().enumerate() {
        println!(
            "  {} {} {} {}",
            format!("[{}]", i + 1).cyan(),
            key.key_type,
            key.fingerprint.bold(),
            key.comment.dimmed()
        );
    }

    Ok(())
}
