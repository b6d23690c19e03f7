//! Generated keys written to disk and authorized, end to end

use std::fs;

use ssh_keypair::config::{
    authorize_key, authorize_new_key, list_keys, read_public_key, save_key_pair,
    AuthorizeOutcome, MARKER_COMMENT,
};
use ssh_keypair::crypto::SystemKeyGenerator;
use ssh_keypair::keygen::generate_ssh_key_pair;
use ssh_keypair::ssh::{decode_private_key, PublicKeyLine};

#[tokio::test]
async fn generate_save_authorize_list() {
    let home = tempfile::tempdir().unwrap();
    let ssh_dir = home.path().join(".ssh");

    let pair = generate_ssh_key_pair(&SystemKeyGenerator::new(), "alice@workstation")
        .await
        .unwrap();
    let saved = save_key_pair(&ssh_dir, &pair, false).unwrap();

    // Files read back exactly as generated
    let private = fs::read_to_string(&saved.private_key).unwrap();
    assert_eq!(private, pair.private_key);
    assert_eq!(decode_private_key(&private).unwrap().comment, "alice@workstation");

    let public = read_public_key(&saved.public_key).unwrap();
    assert_eq!(public, pair.public_key);

    assert_eq!(authorize_key(&ssh_dir, &public).unwrap(), AuthorizeOutcome::Added);
    assert_eq!(
        authorize_key(&ssh_dir, &public).unwrap(),
        AuthorizeOutcome::AlreadyPresent
    );

    let keys = list_keys(&ssh_dir).unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].key_type, "ssh-ed25519");
    assert_eq!(keys[0].comment, format!("alice@workstation {}", MARKER_COMMENT));
    assert_eq!(
        keys[0].fingerprint,
        PublicKeyLine::parse(&public).unwrap().fingerprint()
    );
}

#[tokio::test]
async fn two_key_types_live_side_by_side() {
    let dir = tempfile::tempdir().unwrap();

    let ed = generate_ssh_key_pair(&SystemKeyGenerator::new(), "")
        .await
        .unwrap();
    let rsa = generate_ssh_key_pair(
        &SystemKeyGenerator::new().without_ed25519().with_rsa_bits(2048),
        "",
    )
    .await
    .unwrap();

    let ed_files = save_key_pair(dir.path(), &ed, false).unwrap();
    let rsa_files = save_key_pair(dir.path(), &rsa, false).unwrap();

    assert!(ed_files.private_key.ends_with("id_ed25519"));
    assert!(rsa_files.private_key.ends_with("id_rsa"));
    assert!(rsa_files.public_key.ends_with("id_rsa.pub"));
}

#[tokio::test]
async fn one_shot_key_is_authorized_without_key_files() {
    let home = tempfile::tempdir().unwrap();
    let ssh_dir = home.path().join(".ssh");

    let (pair, outcome) = authorize_new_key(&SystemKeyGenerator::new(), &ssh_dir, "")
        .await
        .unwrap();
    assert_eq!(outcome, AuthorizeOutcome::Added);
    assert!(decode_private_key(&pair.private_key).is_ok());

    let keys = list_keys(&ssh_dir).unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].comment, MARKER_COMMENT);
    assert_eq!(
        keys[0].fingerprint,
        PublicKeyLine::parse(&pair.public_key).unwrap().fingerprint()
    );

    let line = fs::read_to_string(ssh_dir.join("authorized_keys")).unwrap();
    assert!(line.starts_with("restrict,pty ssh-ed25519 "));

    let key_files: Vec<_> = fs::read_dir(&ssh_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .filter(|name| name.to_string_lossy().starts_with("id_"))
        .collect();
    assert!(key_files.is_empty());
}
