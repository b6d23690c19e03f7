//! Raw asymmetric key generation
//!
//! The OpenSSH encoders never generate keys themselves. They consume a
//! `RawKeyPair` from a `KeyGenerator`, which reports an unavailable algorithm
//! as `Generated::Unsupported` rather than as an error so callers can fall back
//! without matching on error strings.

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};
use rsa::{BigUint, RsaPrivateKey};
use tracing::debug;

use super::SecureBytes;
use crate::error::{Result, SshKeyError};
use crate::ssh::rsa::{KEY_BITS, PUBLIC_EXPONENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Ed25519,
    Rsa4096,
}

/// Key material exactly as the generator exports it
///
/// - Ed25519: 32-byte raw public key, 32-byte seed
/// - RSA: SubjectPublicKeyInfo DER public key, PKCS#8 DER private key
#[derive(Debug)]
pub struct RawKeyPair {
    pub public_key: Vec<u8>,
    pub private_key: SecureBytes,
}

#[derive(Debug)]
pub enum Generated {
    KeyPair(RawKeyPair),
    /// The algorithm is not available here; any other failure is an `Err`
    Unsupported,
}

#[async_trait]
pub trait KeyGenerator: Send + Sync {
    async fn generate(&self, algorithm: KeyAlgorithm) -> Result<Generated>;
}

/// Generator backed by `ed25519-dalek` and `rsa`
#[derive(Debug, Clone)]
pub struct SystemKeyGenerator {
    ed25519: bool,
    rsa_bits: usize,
}

impl SystemKeyGenerator {
    pub fn new() -> Self {
        Self {
            ed25519: true,
            rsa_bits: KEY_BITS,
        }
    }

    /// Report Ed25519 as unsupported, forcing the RSA path
    pub fn without_ed25519(mut self) -> Self {
        self.ed25519 = false;
        self
    }

    /// Override the RSA modulus size (only meant for tests; keys are always
    /// labelled RSA-4096)
    pub fn with_rsa_bits(mut self, bits: usize) -> Self {
        self.rsa_bits = bits;
        self
    }
}

impl Default for SystemKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyGenerator for SystemKeyGenerator {
    async fn generate(&self, algorithm: KeyAlgorithm) -> Result<Generated> {
        match algorithm {
            KeyAlgorithm::Ed25519 if !self.ed25519 => Ok(Generated::Unsupported),
            KeyAlgorithm::Ed25519 => Ok(Generated::KeyPair(generate_ed25519())),
            KeyAlgorithm::Rsa4096 => {
                let bits = self.rsa_bits;
                // Prime search takes seconds; keep it off the async workers
                let key_pair = tokio::task::spawn_blocking(move || generate_rsa(bits))
                    .await
                    .map_err(|e| SshKeyError::KeyGenerationFailed(e.to_string()))??;
                Ok(Generated::KeyPair(key_pair))
            }
        }
    }
}

fn generate_ed25519() -> RawKeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    debug!("generated Ed25519 key");

    RawKeyPair {
        public_key: signing_key.verifying_key().to_bytes().to_vec(),
        private_key: SecureBytes::new(signing_key.to_bytes().to_vec()),
    }
}

fn generate_rsa(bits: usize) -> Result<RawKeyPair> {
    let exponent = BigUint::from(PUBLIC_EXPONENT);
    let private_key = RsaPrivateKey::new_with_exp(&mut OsRng, bits, &exponent)
        .map_err(|e| SshKeyError::KeyGenerationFailed(e.to_string()))?;
    debug!(bits, "generated RSA key");

    let pkcs8 = private_key
        .to_pkcs8_der()
        .map_err(|e| SshKeyError::KeyExportFailed(e.to_string()))?;
    let spki = private_key
        .to_public_key()
        .to_public_key_der()
        .map_err(|e| SshKeyError::KeyExportFailed(e.to_string()))?;

    Ok(RawKeyPair {
        public_key: spki.as_bytes().to_vec(),
        private_key: SecureBytes::from(pkcs8.as_bytes()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::VerifyingKey;

    #[tokio::test]
    async fn test_generate_ed25519() {
        let generated = SystemKeyGenerator::new()
            .generate(KeyAlgorithm::Ed25519)
            .await
            .unwrap();

        let Generated::KeyPair(key_pair) = generated else {
            panic!("Ed25519 should be supported");
        };
        assert_eq!(key_pair.public_key.len(), 32);
        assert_eq!(key_pair.private_key.len(), 32);

        // Public key must be derived from the exported seed
        let seed: [u8; 32] = key_pair.private_key[..].try_into().unwrap();
        let derived: VerifyingKey = SigningKey::from_bytes(&seed).verifying_key();
        assert_eq!(derived.to_bytes().to_vec(), key_pair.public_key);
    }

    #[tokio::test]
    async fn test_ed25519_can_be_disabled() {
        let generated = SystemKeyGenerator::new()
            .without_ed25519()
            .generate(KeyAlgorithm::Ed25519)
            .await
            .unwrap();
        assert!(matches!(generated, Generated::Unsupported));
    }

    #[tokio::test]
    async fn test_generate_rsa_exports_pkcs8() {
        let generated = SystemKeyGenerator::new()
            .with_rsa_bits(2048)
            .generate(KeyAlgorithm::Rsa4096)
            .await
            .unwrap();

        let Generated::KeyPair(key_pair) = generated else {
            panic!("RSA should be supported");
        };
        // PrivateKeyInfo SEQUENCE, version 0, rsaEncryption AlgorithmIdentifier
        assert_eq!(key_pair.private_key[0], 0x30);
        assert!(key_pair
            .private_key
            .windows(9)
            .any(|w| w == [0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01]));
        assert_eq!(key_pair.public_key[0], 0x30);
    }
}
