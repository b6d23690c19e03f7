//! Where generated keys end up
//!
//! Handles:
//! - Writing key pairs to an SSH directory with OpenSSH's file modes
//! - Managed, restricted entries in `authorized_keys`

mod authorized_keys;
mod storage;

pub use authorized_keys::{
    authorize_key, authorize_new_key, authorized_keys_path, list_keys, managed_entry,
    AuthorizeOutcome, KeyInfo, AUTHORIZED_KEYS_FILE, DEFAULT_OPTIONS, MARKER_COMMENT,
};
pub use storage::{
    default_ssh_dir, ensure_ssh_dir, public_key_path, read_public_key, save_key_pair,
    SavedKeyPair,
};
