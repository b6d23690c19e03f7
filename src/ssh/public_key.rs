//! OpenSSH public key lines (`<algorithm> <base64> [comment]`)

use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
    Engine as _,
};
use sha2::{Digest, Sha256};

use super::wire::SshReader;
use crate::error::{Result, SshKeyError};

/// Render a public key line. An empty comment is omitted entirely.
pub fn format_line(algorithm: &str, blob: &[u8], comment: &str) -> String {
    let encoded = STANDARD.encode(blob);
    if comment.is_empty() {
        format!("{} {}", algorithm, encoded)
    } else {
        format!("{} {} {}", algorithm, encoded, comment)
    }
}

/// SHA256 fingerprint of a public key blob, in the form `ssh-keygen -l` prints
pub fn fingerprint_sha256(blob: &[u8]) -> String {
    let digest = Sha256::digest(blob);
    format!("SHA256:{}", STANDARD_NO_PAD.encode(digest))
}

/// A parsed public key line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyLine {
    pub algorithm: String,
    pub blob: Vec<u8>,
    pub comment: String,
}

impl PublicKeyLine {
    /// Parse `<algorithm> <base64> [comment]`.
    /// The comment is everything after the blob and may contain spaces.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Err(SshKeyError::InvalidPublicKey("empty".into()));
        }

        let mut parts = line.splitn(3, char::is_whitespace);
        let algorithm = parts.next().unwrap_or_default();
        let encoded = parts
            .next()
            .ok_or_else(|| SshKeyError::InvalidPublicKey("missing key data".into()))?;
        let comment = parts.next().map(str::trim).unwrap_or_default();

        let blob = STANDARD.decode(encoded.trim())?;

        // The blob repeats the algorithm as its first string
        let embedded = SshReader::new(&blob).read_string()?;
        if embedded != algorithm {
            return Err(SshKeyError::InvalidPublicKey(format!(
                "key data is {} but line says {}",
                embedded, algorithm
            )));
        }

        Ok(Self {
            algorithm: algorithm.to_string(),
            blob,
            comment: comment.to_string(),
        })
    }

    pub fn fingerprint(&self) -> String {
        fingerprint_sha256(&self.blob)
    }
}

impl std::fmt::Display for PublicKeyLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_line(&self.algorithm, &self.blob, &self.comment))
    }
}
