//! Key generation capability and secret buffers
//!
//! This module provides:
//! - The `KeyGenerator` seam the OpenSSH encoders are fed from
//! - A system generator using Ed25519 (`ed25519-dalek`) and RSA (`rsa`)
//! - Zeroizing storage for exported private key material

mod keys;
mod secure_bytes;

pub use keys::{Generated, KeyAlgorithm, KeyGenerator, RawKeyPair, SystemKeyGenerator};
pub use secure_bytes::SecureBytes;
