//! Top-level key pair generation
//!
//! Ed25519 is preferred. If the generator reports it as unsupported, a single
//! RSA-4096 attempt is made; any other failure propagates unchanged.

use serde::Serialize;
use tracing::{info, warn};

use crate::crypto::{Generated, KeyAlgorithm, KeyGenerator, RawKeyPair};
use crate::error::{Result, SshKeyError};
use crate::ssh::{ed25519, parse_rsa_private_key, rsa};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeyType {
    #[serde(rename = "Ed25519")]
    Ed25519,
    #[serde(rename = "RSA-4096")]
    Rsa4096,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Ed25519 => "Ed25519",
            KeyType::Rsa4096 => "RSA-4096",
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conventional file name for a private key of this type
pub fn key_file_name(key_type: KeyType) -> &'static str {
    match key_type {
        KeyType::Ed25519 => "id_ed25519",
        KeyType::Rsa4096 => "id_rsa",
    }
}

/// A generated key pair in OpenSSH text form
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SshKeyPair {
    /// `<algorithm> <base64> [comment]`, no trailing newline
    pub public_key: String,
    /// Armored OpenSSH v1 private key, ending in a newline
    pub private_key: String,
    pub key_type: KeyType,
}

impl std::fmt::Debug for SshKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshKeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .field("key_type", &self.key_type)
            .finish()
    }
}

impl Drop for SshKeyPair {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.private_key.zeroize();
    }
}

/// Generate a key pair, preferring Ed25519 and falling back to RSA-4096
pub async fn generate_ssh_key_pair<G>(generator: &G, comment: &str) -> Result<SshKeyPair>
where
    G: KeyGenerator + ?Sized,
{
    match generator.generate(KeyAlgorithm::Ed25519).await? {
        Generated::KeyPair(raw) => {
            info!("generated Ed25519 key pair");
            encode_ed25519(&raw, comment)
        }
        Generated::Unsupported => {
            warn!("Ed25519 is not supported, falling back to RSA-4096");
            match generator.generate(KeyAlgorithm::Rsa4096).await? {
                Generated::KeyPair(raw) => {
                    info!("generated RSA-4096 key pair");
                    encode_rsa(&raw, comment)
                }
                Generated::Unsupported => Err(SshKeyError::NoSupportedAlgorithm),
            }
        }
    }
}

/// Whether the generator can produce Ed25519 keys. Errors count as "no".
pub async fn supports_ed25519<G>(generator: &G) -> bool
where
    G: KeyGenerator + ?Sized,
{
    matches!(
        generator.generate(KeyAlgorithm::Ed25519).await,
        Ok(Generated::KeyPair(_))
    )
}

fn encode_ed25519(raw: &RawKeyPair, comment: &str) -> Result<SshKeyPair> {
    let public: &[u8; ed25519::KEY_LEN] = raw.public_key.as_slice().try_into().map_err(|_| {
        SshKeyError::KeyExportFailed(format!(
            "Ed25519 public key is {} bytes, expected {}",
            raw.public_key.len(),
            ed25519::KEY_LEN
        ))
    })?;
    let seed: &[u8; ed25519::KEY_LEN] = raw.private_key[..].try_into().map_err(|_| {
        SshKeyError::KeyExportFailed(format!(
            "Ed25519 seed is {} bytes, expected {}",
            raw.private_key.len(),
            ed25519::KEY_LEN
        ))
    })?;

    Ok(SshKeyPair {
        public_key: ed25519::encode_public_key(public, comment),
        private_key: ed25519::encode_private_key(seed, public, comment),
        key_type: KeyType::Ed25519,
    })
}

fn encode_rsa(raw: &RawKeyPair, comment: &str) -> Result<SshKeyPair> {
    let components = parse_rsa_private_key(&raw.private_key)?;

    Ok(SshKeyPair {
        public_key: rsa::encode_public_key(&components.n, &components.e, comment),
        private_key: rsa::encode_private_key(&components, comment),
        key_type: KeyType::Rsa4096,
    })
}
