//! Key files on disk
//!
//! Layout matches what `ssh-keygen` produces:
//! - `<dir>/id_ed25519` or `<dir>/id_rsa`: private key, mode 0600
//! - `<dir>/<name>.pub`: public key line plus newline, mode 0644
//! - `<dir>` itself: mode 0700

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, SshKeyError};
use crate::keygen::{key_file_name, SshKeyPair};

const SSH_DIR: &str = ".ssh";
const PUBLIC_KEY_SUFFIX: &str = ".pub";

const DIR_MODE: u32 = 0o700;
const PRIVATE_KEY_MODE: u32 = 0o600;
const PUBLIC_KEY_MODE: u32 = 0o644;

/// Paths written by [`save_key_pair`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedKeyPair {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

/// `~/.ssh` for the current user
pub fn default_ssh_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(SSH_DIR))
        .ok_or(SshKeyError::NoHomeDirectory)
}

/// Create `dir` with mode 0700, or tighten its mode if it already exists
pub fn ensure_ssh_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        info!(dir = %dir.display(), "created SSH directory");
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(dir)?.permissions().mode() & 0o777;
        if mode != DIR_MODE {
            fs::set_permissions(dir, fs::Permissions::from_mode(DIR_MODE))?;
            info!(dir = %dir.display(), "fixed SSH directory permissions");
        }
    }

    Ok(())
}

/// Write both halves of `pair` into `dir` under the conventional file names
///
/// Existing files are left untouched unless `overwrite` is set.
pub fn save_key_pair(dir: &Path, pair: &SshKeyPair, overwrite: bool) -> Result<SavedKeyPair> {
    let private_path = dir.join(key_file_name(pair.key_type));
    let public_path = public_key_path(&private_path);

    if !overwrite {
        for path in [&private_path, &public_path] {
            if path.exists() {
                return Err(SshKeyError::KeyFileExists(path.clone()));
            }
        }
    }

    ensure_ssh_dir(dir)?;

    write_key_file(&private_path, pair.private_key.as_bytes(), PRIVATE_KEY_MODE)?;
    write_key_file(
        &public_path,
        format!("{}\n", pair.public_key).as_bytes(),
        PUBLIC_KEY_MODE,
    )?;

    info!(path = %private_path.display(), key_type = %pair.key_type, "saved key pair");

    Ok(SavedKeyPair {
        private_key: private_path,
        public_key: public_path,
    })
}

/// `id_ed25519` -> `id_ed25519.pub`
pub fn public_key_path(private_key: &Path) -> PathBuf {
    let mut name = private_key.as_os_str().to_os_string();
    name.push(PUBLIC_KEY_SUFFIX);
    PathBuf::from(name)
}

/// First non-empty line of a public key file
pub fn read_public_key(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SshKeyError::InvalidPublicKey(format!("{} is empty", path.display())))
}

fn write_key_file(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    // Restrict from the first byte so the key is never briefly world-readable
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()?;

    // An overwritten file keeps its old mode
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}
