//! OpenSSH v1 private key container
//!
//! ```text
//! "openssh-key-v1\0"
//! string  ciphername        ("none")
//! string  kdfname           ("none")
//! string  kdfoptions        (empty)
//! uint32  number of keys    (1)
//! string  public key blob
//! string  private section, padded to the cipher block size (8 for "none"):
//!     uint32  checkint
//!     uint32  checkint
//!     string  key type
//!     ...     key-type specific fields
//!     string  comment
//!     byte[]  padding 1, 2, 3, ...
//! ```

use rand::rngs::OsRng;
use rand::RngCore;

use super::armor;
use super::wire::{SshReader, SshWriter, WireError};
use crate::error::{Result, SshKeyError};

pub const AUTH_MAGIC: &[u8] = b"openssh-key-v1\0";

const CIPHER_NONE: &str = "none";
const KDF_NONE: &str = "none";

/// Block size the private section is padded to when no cipher is used
pub const BLOCK_SIZE: usize = 8;

/// Random value written twice at the start of the private section.
/// A reader that decrypts correctly sees two identical copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInt(pub u32);

impl CheckInt {
    pub fn random() -> Self {
        Self(OsRng.next_u32())
    }
}

/// Start a private section: both check-ints followed by the key type
pub(crate) fn begin_private_section(check: CheckInt, key_type: &str) -> SshWriter {
    let mut section = SshWriter::with_capacity(256);
    section
        .write_u32(check.0)
        .write_u32(check.0)
        .write_string(key_type);
    section
}

/// Pad `section` with 1, 2, 3, ... up to the next multiple of `BLOCK_SIZE`
pub fn pad_private_section(mut section: Vec<u8>) -> Vec<u8> {
    let padding = (BLOCK_SIZE - section.len() % BLOCK_SIZE) % BLOCK_SIZE;
    section.extend((1..=padding).map(|i| i as u8));
    section
}

/// Wrap a public blob and an unpadded private section into the armored container
pub(crate) fn seal(public_blob: &[u8], private_section: SshWriter) -> String {
    let private_section = pad_private_section(private_section.into_bytes());

    let mut key = SshWriter::with_capacity(
        AUTH_MAGIC.len() + 32 + public_blob.len() + private_section.len(),
    );
    key.write_bytes(AUTH_MAGIC)
        .write_string(CIPHER_NONE)
        .write_string(KDF_NONE)
        .write_string(b"")
        .write_u32(1)
        .write_string(public_blob)
        .write_string(&private_section);

    armor::armor(&key.into_bytes())
}

/// Key material found in a decoded private section
#[derive(Clone, PartialEq, Eq)]
pub enum KeyFields {
    Ed25519 {
        public: Vec<u8>,
        /// 32-byte seed followed by the 32-byte public key
        private: Vec<u8>,
    },
    Rsa {
        n: Vec<u8>,
        e: Vec<u8>,
        d: Vec<u8>,
        iqmp: Vec<u8>,
        p: Vec<u8>,
        q: Vec<u8>,
    },
}

impl std::fmt::Debug for KeyFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyFields::Ed25519 { public, .. } => f
                .debug_struct("Ed25519")
                .field("public", public)
                .field("private", &"[REDACTED]")
                .finish(),
            KeyFields::Rsa { n, e, .. } => f
                .debug_struct("Rsa")
                .field("n_len", &n.len())
                .field("e", e)
                .field("private", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Structure of an unencrypted OpenSSH private key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPrivateKey {
    pub cipher: String,
    pub kdf: String,
    pub public_blob: Vec<u8>,
    pub check_ints: (u32, u32),
    pub key_type: String,
    pub fields: KeyFields,
    pub comment: String,
    pub padding: Vec<u8>,
}

/// Parse an armored OpenSSH private key without decrypting anything
///
/// Only the `none` cipher is accepted. Check-ints must match and padding must
/// follow the 1, 2, 3, ... pattern, the same rules `ssh-keygen` applies.
pub fn decode_private_key(text: &str) -> Result<DecodedPrivateKey> {
    let blob = armor::dearmor(text)?;

    let magic = blob.get(..AUTH_MAGIC.len());
    if magic != Some(AUTH_MAGIC) {
        return Err(invalid("bad magic"));
    }

    let mut reader = SshReader::new(&blob[AUTH_MAGIC.len()..]);
    let cipher = reader.read_string()?.to_string();
    let kdf = reader.read_string()?.to_string();
    let _kdf_options = reader.read_bytes()?;

    if cipher != CIPHER_NONE || kdf != KDF_NONE {
        return Err(invalid(format!("encrypted keys are not supported ({})", cipher)));
    }

    let count = reader.read_u32()?;
    if count != 1 {
        return Err(invalid(format!("expected 1 key, found {}", count)));
    }

    let public_blob = reader.read_bytes()?.to_vec();
    let section = reader.read_bytes()?;
    if !reader.is_empty() {
        return Err(invalid("trailing data after private section"));
    }
    if section.len() % BLOCK_SIZE != 0 {
        return Err(invalid("private section is not block aligned"));
    }

    let mut private = SshReader::new(section);
    let check_ints = (private.read_u32()?, private.read_u32()?);
    if check_ints.0 != check_ints.1 {
        return Err(invalid("check-int mismatch"));
    }

    let key_type = private.read_string()?.to_string();
    let fields = read_key_fields(&key_type, &mut private)?;
    let comment = private.read_string()?.to_string();

    let padding = private.remaining().to_vec();
    let well_formed = padding.len() < BLOCK_SIZE
        && padding
            .iter()
            .enumerate()
            .all(|(i, &b)| b as usize == i + 1);
    if !well_formed {
        return Err(invalid("bad padding"));
    }

    Ok(DecodedPrivateKey {
        cipher,
        kdf,
        public_blob,
        check_ints,
        key_type,
        fields,
        comment,
        padding,
    })
}

fn read_key_fields(key_type: &str, reader: &mut SshReader<'_>) -> Result<KeyFields> {
    match key_type {
        "ssh-ed25519" => Ok(KeyFields::Ed25519 {
            public: owned(reader)?,
            private: owned(reader)?,
        }),
        "ssh-rsa" => Ok(KeyFields::Rsa {
            n: owned(reader)?,
            e: owned(reader)?,
            d: owned(reader)?,
            iqmp: owned(reader)?,
            p: owned(reader)?,
            q: owned(reader)?,
        }),
        other => Err(invalid(format!("unsupported key type {}", other))),
    }
}

fn owned(reader: &mut SshReader<'_>) -> std::result::Result<Vec<u8>, WireError> {
    Ok(reader.read_bytes()?.to_vec())
}

fn invalid(reason: impl Into<String>) -> SshKeyError {
    SshKeyError::InvalidPrivateKey(reason.into())
}
