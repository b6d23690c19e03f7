//! Describe the structure of an unencrypted OpenSSH private key
//!
//! Secret fields are reported by size only.

use std::fs;
use std::path::Path;

use colored::Colorize;

use crate::error::Result;
use crate::ssh::{decode_private_key, fingerprint_sha256, KeyFields};

pub fn run(path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)?;
    let key = decode_private_key(&text)?;

    println!("{}", format!("=== {} ===", path.display()).cyan().bold());
    println!("Cipher / KDF:   {} / {}", key.cipher, key.kdf);
    println!("Key type:       {}", key.key_type);
    println!("Fingerprint:    {}", fingerprint_sha256(&key.public_blob));
    println!("Comment:        {}", key.comment);
    println!(
        "Check-ints:     {}",
        if key.check_ints.0 == key.check_ints.1 {
            "match".green()
        } else {
            "mismatch".red()
        }
    );
    println!("Padding:        {} bytes", key.padding.len());

    match &key.fields {
        KeyFields::Ed25519 { public, private } => {
            println!("Public key:     {} bytes", public.len());
            println!("Private key:    {} bytes (seed + public)", private.len());
        }
        KeyFields::Rsa { n, e, .. } => {
            let bits = n.iter().skip_while(|&&b| b == 0).count() * 8;
            println!("Modulus:        ~{} bits", bits);
            println!("Exponent:       {} bytes", e.len());
            println!("Private fields: d, iqmp, p, q");
        }
    }

    Ok(())
}
