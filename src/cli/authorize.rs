//! Add a public key to authorized_keys as a restricted, managed entry

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::config::{self, AuthorizeOutcome};
use crate::error::Result;

pub fn run(public_key_file: &Path, ssh_dir: Option<PathBuf>) -> Result<()> {
    let public_key = config::read_public_key(public_key_file)?;
    let ssh_dir = match ssh_dir {
        Some(dir) => dir,
        None => config::default_ssh_dir()?,
    };

    match config::authorize_key(&ssh_dir, &public_key)? {
        AuthorizeOutcome::Added => println!(
            "{} {}",
            "Added to".green(),
            config::authorized_keys_path(&ssh_dir).display()
        ),
        AuthorizeOutcome::AlreadyPresent => {
            println!("{}", "Key is already authorized.".yellow())
        }
    }

    Ok(())
}
