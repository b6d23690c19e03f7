//! Generate a new key pair and write it to disk

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::config::{self, AuthorizeOutcome};
use crate::crypto::SystemKeyGenerator;
use crate::error::Result;
use crate::keygen::{generate_ssh_key_pair, key_file_name, KeyType, SshKeyPair};
use crate::ssh::PublicKeyLine;

use super::{confirm, runtime};

pub struct GenerateOptions {
    pub comment: String,
    /// Skip Ed25519 and go straight to RSA-4096
    pub rsa: bool,
    pub out_dir: Option<PathBuf>,
    pub force: bool,
    /// Write the key pair to stdout instead of files
    pub print: bool,
    pub json: bool,
    /// Also add the public key to authorized_keys
    pub authorize: bool,
    /// SSH directory holding authorized_keys, defaults to `~/.ssh`
    pub ssh_dir: Option<PathBuf>,
}

pub fn run(options: GenerateOptions) -> Result<()> {
    let generator = if options.rsa {
        SystemKeyGenerator::new().without_ed25519()
    } else {
        SystemKeyGenerator::new()
    };

    if !options.print {
        print!("{}", "Generating SSH key pair... ".cyan());
        std::io::Write::flush(&mut std::io::stdout())?;
    }

    let pair = runtime()?.block_on(generate_ssh_key_pair(&generator, &options.comment))?;

    // Printed keys never touch disk; with --authorize this is a one-shot key
    if options.print {
        authorize(&options, &pair)?;
        return print_pair(&pair, options.json);
    }
    println!("{} ({})", "done".green(), pair.key_type);

    if pair.key_type == KeyType::Rsa4096 && !options.rsa {
        println!(
            "{} Ed25519 is unavailable, an RSA-4096 key was generated instead.",
            "Note:".yellow().bold()
        );
    }

    let dir = match &options.out_dir {
        Some(dir) => dir.clone(),
        None => config::default_ssh_dir()?,
    };

    let existing = existing_key_files(&dir, pair.key_type);
    if !existing.is_empty() && !options.force {
        for path in &existing {
            println!(
                "{} {} already exists.",
                "Warning:".yellow().bold(),
                path.display()
            );
        }
        if !confirm("Overwrite?") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let saved = config::save_key_pair(&dir, &pair, true)?;
    let authorized = authorize(&options, &pair)?;
    let fingerprint = PublicKeyLine::parse(&pair.public_key)?.fingerprint();

    println!();
    println!("Private key: {}", saved.private_key.display().to_string().cyan());
    println!("Public key:  {}", saved.public_key.display().to_string().cyan());
    println!("Fingerprint: {}", fingerprint.bold());
    println!();
    println!("{}", "─".repeat(60).dimmed());
    println!("{}", pair.public_key);
    println!("{}", "─".repeat(60).dimmed());
    println!();
    if let Some((outcome, ssh_dir)) = &authorized {
        report_authorized(*outcome, ssh_dir);
    } else {
        println!(
            "To allow this key to log in here, run: {}",
            format!("ssh-keypair authorize {}", saved.public_key.display()).cyan()
        );
    }

    Ok(())
}

/// Key files for `key_type` already present in `dir`, either half
fn existing_key_files(dir: &Path, key_type: KeyType) -> Vec<PathBuf> {
    let private_path = dir.join(key_file_name(key_type));
    [config::public_key_path(&private_path), private_path]
        .into_iter()
        .filter(|path| path.exists())
        .collect()
}

fn authorize(
    options: &GenerateOptions,
    pair: &SshKeyPair,
) -> Result<Option<(AuthorizeOutcome, PathBuf)>> {
    if !options.authorize {
        return Ok(None);
    }
    let ssh_dir = match &options.ssh_dir {
        Some(dir) => dir.clone(),
        None => config::default_ssh_dir()?,
    };
    let outcome = config::authorize_key(&ssh_dir, &pair.public_key)?;
    Ok(Some((outcome, ssh_dir)))
}

fn report_authorized(outcome: AuthorizeOutcome, ssh_dir: &Path) {
    match outcome {
        AuthorizeOutcome::Added => println!(
            "{} {}",
            "Authorized in".green(),
            config::authorized_keys_path(ssh_dir).display()
        ),
        AuthorizeOutcome::AlreadyPresent => {
            println!("{}", "Key is already authorized.".yellow())
        }
    }
}

fn print_pair(pair: &SshKeyPair, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(pair)?);
    } else {
        print!("{}", pair.private_key);
        println!("{}", pair.public_key);
    }
    Ok(())
}
