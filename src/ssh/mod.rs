//! OpenSSH key serialization
//!
//! This module provides:
//! - SSH wire primitives (`string`, `mpint`) behind a writer/reader pair
//! - PEM-style armor for the private key container
//! - A minimal DER reader for PKCS#8 RSA exports
//! - Ed25519 and RSA encoders for public key lines and OpenSSH v1 private keys

pub mod armor;
pub mod der;
pub mod ed25519;
pub mod private_key;
pub mod public_key;
pub mod rsa;
pub mod wire;

pub use der::{parse_der_integer, parse_rsa_private_key, DerError, DerInteger};
pub use private_key::{decode_private_key, CheckInt, DecodedPrivateKey, KeyFields, AUTH_MAGIC};
pub use public_key::{fingerprint_sha256, PublicKeyLine};
pub use rsa::RsaKeyComponents;
pub use wire::{ssh_mpint, ssh_string, SshReader, SshWriter, WireError};
