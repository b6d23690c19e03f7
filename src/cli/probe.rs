//! Report which key algorithms are available

use colored::Colorize;

use crate::crypto::SystemKeyGenerator;
use crate::error::Result;
use crate::keygen::{key_file_name, supports_ed25519, KeyType};

use super::runtime;

pub fn run() -> Result<()> {
    let supported = runtime()?.block_on(supports_ed25519(&SystemKeyGenerator::new()));

    let key_type = if supported {
        println!("Ed25519: {}", "supported".green());
        KeyType::Ed25519
    } else {
        println!("Ed25519: {}", "not supported".yellow());
        KeyType::Rsa4096
    };

    println!(
        "New keys will be {} ({})",
        key_type.to_string().bold(),
        key_file_name(key_type)
    );
    Ok(())
}
