//! Ed25519 keys in OpenSSH format
//!
//! The OpenSSH private key field for Ed25519 is 64 bytes: the 32-byte seed
//! followed by the 32-byte public key, the layout of a libsodium secret key.

use zeroize::Zeroizing;

use super::private_key::{begin_private_section, seal, CheckInt};
use super::public_key::format_line;
use super::wire::SshWriter;

pub const ALGORITHM: &str = "ssh-ed25519";

/// Raw key length for both halves
pub const KEY_LEN: usize = 32;

/// Public key blob: `string("ssh-ed25519") ++ string(public)`
pub fn public_blob(raw_public: &[u8; KEY_LEN]) -> Vec<u8> {
    let mut blob = SshWriter::with_capacity(4 + ALGORITHM.len() + 4 + KEY_LEN);
    blob.write_string(ALGORITHM).write_string(raw_public);
    blob.into_bytes()
}

/// `ssh-ed25519 <base64> [comment]`
pub fn encode_public_key(raw_public: &[u8; KEY_LEN], comment: &str) -> String {
    format_line(ALGORITHM, &public_blob(raw_public), comment)
}

/// Armored OpenSSH v1 private key with a fresh random check-int
pub fn encode_private_key(
    raw_private: &[u8; KEY_LEN],
    raw_public: &[u8; KEY_LEN],
    comment: &str,
) -> String {
    encode_private_key_with_check_int(raw_private, raw_public, comment, CheckInt::random())
}

/// Same as [`encode_private_key`] with a caller-supplied check-int
pub fn encode_private_key_with_check_int(
    raw_private: &[u8; KEY_LEN],
    raw_public: &[u8; KEY_LEN],
    comment: &str,
    check: CheckInt,
) -> String {
    let mut keypair = Zeroizing::new([0u8; 2 * KEY_LEN]);
    keypair[..KEY_LEN].copy_from_slice(raw_private);
    keypair[KEY_LEN..].copy_from_slice(raw_public);

    let mut section = begin_private_section(check, ALGORITHM);
    section
        .write_string(raw_public)
        .write_string(&keypair[..])
        .write_string(comment);

    seal(&public_blob(raw_public), section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::private_key::{decode_private_key, KeyFields};
    use crate::ssh::public_key::PublicKeyLine;

    const SEED: [u8; 32] = [0x11; 32];
    const PUBLIC: [u8; 32] = [0x22; 32];

    #[test]
    fn test_public_blob_layout() {
        let blob = public_blob(&PUBLIC);
        assert_eq!(blob.len(), 51);
        assert_eq!(&blob[..4], &[0, 0, 0, 11]);
        assert_eq!(&blob[4..15], b"ssh-ed25519");
        assert_eq!(&blob[15..19], &[0, 0, 0, 32]);
        assert_eq!(&blob[19..], &PUBLIC);
    }

    #[test]
    fn test_public_key_line() {
        let line = encode_public_key(&PUBLIC, "user@host");
        assert!(line.starts_with("ssh-ed25519 "));
        assert!(line.ends_with(" user@host"));

        let parsed = PublicKeyLine::parse(&line).unwrap();
        assert_eq!(parsed.blob, public_blob(&PUBLIC));
    }

    #[test]
    fn test_private_key_fields() {
        let text = encode_private_key_with_check_int(&SEED, &PUBLIC, "user@host", CheckInt(42));
        let decoded = decode_private_key(&text).unwrap();

        assert_eq!(decoded.check_ints, (42, 42));
        assert_eq!(decoded.key_type, "ssh-ed25519");
        assert_eq!(decoded.public_blob, public_blob(&PUBLIC));
        assert_eq!(decoded.comment, "user@host");
        assert_eq!(
            decoded.fields,
            KeyFields::Ed25519 {
                public: PUBLIC.to_vec(),
                private: [SEED, PUBLIC].concat(),
            }
        );
    }

    #[test]
    fn test_private_section_is_block_aligned() {
        // Comment lengths 0..8 hit every padding length
        for len in 0..8 {
            let comment = "c".repeat(len);
            let text = encode_private_key(&SEED, &PUBLIC, &comment);
            let decoded = decode_private_key(&text).unwrap();

            // 8 check + 15 type + 36 pub + 68 priv + 4 + len comment
            let unpadded = 8 + 15 + 36 + 68 + 4 + len;
            assert_eq!((unpadded + decoded.padding.len()) % 8, 0);
            assert_eq!(decoded.comment, comment);
        }
    }
}
