//! Managed entries in `authorized_keys`
//!
//! Keys added through this tool carry a marker in their comment and the
//! `restrict` option, so they can be listed (and audited) separately from keys
//! the user manages by hand.

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use ssh_key::authorized_keys::Entry;
use ssh_key::HashAlg;
use tracing::{info, warn};

use super::storage::ensure_ssh_dir;
use crate::crypto::KeyGenerator;
use crate::error::{Result, SshKeyError};
use crate::keygen::{generate_ssh_key_pair, SshKeyPair};
use crate::ssh::PublicKeyLine;

pub const AUTHORIZED_KEYS_FILE: &str = "authorized_keys";
const BACKUP_SUFFIX: &str = ".bak";

/// Comment marker identifying managed entries
pub const MARKER_COMMENT: &str = "ssh-keypair";

/// Options given to entries that don't already carry `restrict`
pub const DEFAULT_OPTIONS: &str = "restrict,pty";

const KEY_TYPE_PREFIX: &str = "ssh-";

/// A managed key, without any key material
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyInfo {
    pub key_type: String,
    pub fingerprint: String,
    pub comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizeOutcome {
    Added,
    AlreadyPresent,
}

pub fn authorized_keys_path(ssh_dir: &Path) -> PathBuf {
    ssh_dir.join(AUTHORIZED_KEYS_FILE)
}

/// Rewrite a public key (optionally prefixed with options) into a managed entry
///
/// Returns the entry line and the key's fingerprint.
pub fn managed_entry(public_key: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = public_key.split_whitespace().collect();
    if parts.is_empty() {
        return Err(SshKeyError::InvalidPublicKey("empty".into()));
    }

    let type_index = parts
        .iter()
        .position(|part| part.starts_with(KEY_TYPE_PREFIX))
        .ok_or_else(|| SshKeyError::InvalidPublicKey("key type not found".into()))?;

    let options = if type_index > 0 {
        let mut options: Vec<&str> = parts[0].split(',').collect();
        if !options.contains(&"restrict") {
            options.insert(0, DEFAULT_OPTIONS);
        }
        options.join(",")
    } else {
        DEFAULT_OPTIONS.to_string()
    };

    let key_parts = &parts[type_index..];
    if key_parts.len() < 2 {
        return Err(SshKeyError::InvalidPublicKey("incomplete".into()));
    }

    let key = PublicKeyLine::parse(&format!("{} {}", key_parts[0], key_parts[1]))?;

    let mut comment: Vec<&str> = key_parts[2..].to_vec();
    if !comment.iter().any(|part| part.contains(MARKER_COMMENT)) {
        comment.push(MARKER_COMMENT);
    }

    let line = format!(
        "{} {} {} {}",
        options,
        key_parts[0],
        key_parts[1],
        comment.join(" ")
    );
    Ok((line, key.fingerprint()))
}

/// Append `public_key` to `<ssh_dir>/authorized_keys` as a managed entry
///
/// A managed entry with the same fingerprint is not added twice. An existing
/// file is backed up to `authorized_keys.bak` before it is modified.
pub fn authorize_key(ssh_dir: &Path, public_key: &str) -> Result<AuthorizeOutcome> {
    let (line, fingerprint) = managed_entry(public_key)?;

    ensure_ssh_dir(ssh_dir)?;
    let path = authorized_keys_path(ssh_dir);

    match list_keys(ssh_dir) {
        Ok(keys) if keys.iter().any(|key| key.fingerprint == fingerprint) => {
            info!(%fingerprint, "key already in authorized_keys");
            return Ok(AuthorizeOutcome::AlreadyPresent);
        }
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "could not check existing fingerprints, adding anyway");
        }
    }

    if path.exists() {
        let mut backup = path.clone().into_os_string();
        backup.push(BACKUP_SUFFIX);
        fs::copy(&path, &backup)?;
        info!(backup = ?backup, "backed up authorized_keys");
    }

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(&path)?;

    if needs_newline(&mut file)? {
        file.write_all(b"\n")?;
    }
    file.write_all(line.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }

    info!(%fingerprint, path = %path.display(), "added restricted key");
    Ok(AuthorizeOutcome::Added)
}

/// Generate a fresh key pair and authorize its public half in `ssh_dir`
///
/// Nothing but `authorized_keys` is written; the private key only exists in
/// the returned pair.
pub async fn authorize_new_key<G>(
    generator: &G,
    ssh_dir: &Path,
    comment: &str,
) -> Result<(SshKeyPair, AuthorizeOutcome)>
where
    G: KeyGenerator + ?Sized,
{
    let pair = generate_ssh_key_pair(generator, comment).await?;
    let outcome = authorize_key(ssh_dir, &pair.public_key)?;
    Ok((pair, outcome))
}

/// Managed entries in `<ssh_dir>/authorized_keys`. A missing file is empty.
pub fn list_keys(ssh_dir: &Path) -> Result<Vec<KeyInfo>> {
    let path = authorized_keys_path(ssh_dir);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path)?;
    let mut keys = Vec::new();

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || !line.contains(MARKER_COMMENT) {
            continue;
        }

        let entry = match Entry::from_str(line) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(line = number + 1, error = %e, "skipping unparsable authorized_keys entry");
                continue;
            }
        };

        let public_key = entry.public_key();
        if !public_key.comment().contains(MARKER_COMMENT) {
            continue;
        }

        keys.push(KeyInfo {
            key_type: public_key.algorithm().as_str().to_string(),
            fingerprint: public_key.fingerprint(HashAlg::Sha256).to_string(),
            comment: public_key.comment().to_string(),
        });
    }

    info!(count = keys.len(), dir = %ssh_dir.display(), "listed managed keys");
    Ok(keys)
}

/// True when the file is non-empty and does not end in a newline
fn needs_newline(file: &mut fs::File) -> Result<bool> {
    let len = file.seek(SeekFrom::End(0))?;
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
