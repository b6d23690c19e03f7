use std::path::PathBuf;

use thiserror::Error;

use crate::ssh::{DerError, WireError};

pub type Result<T> = std::result::Result<T, SshKeyError>;

#[derive(Debug, Error)]
pub enum SshKeyError {
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Key export failed: {0}")]
    KeyExportFailed(String),

    #[error("No supported key algorithm is available on this platform")]
    NoSupportedAlgorithm,

    #[error("Invalid RSA private key: {0}")]
    InvalidRsaKey(#[from] DerError),

    #[error("Malformed SSH data: {0}")]
    Wire(#[from] WireError),

    #[error("Invalid public key format: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Key file already exists: {0} (use --force to overwrite)")]
    KeyFileExists(PathBuf),

    #[error("Could not determine the home directory")]
    NoHomeDirectory,

    #[error("Base64 decoding failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
