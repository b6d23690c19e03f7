//! Output must match `ssh-keygen` byte for byte and load in an independent
//! OpenSSH parser (`ssh-key`).
//!
//! Fixtures in `tests/fixtures` were produced with:
//! ```text
//! ssh-keygen -t ed25519 -N "" -C user@host -f ed25519_user_host
//! ssh-keygen -t rsa -b 2048 -N "" -C user@host -f rsa2048_user_host
//! ssh-keygen -p -m PKCS8 -N "" (copy of rsa2048_user_host), body base64-decoded to rsa2048_pkcs8.der
//! ```

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ssh_key::{HashAlg, PrivateKey, PublicKey};

use ssh_keypair::crypto::SystemKeyGenerator;
use ssh_keypair::keygen::{generate_ssh_key_pair, KeyType};
use ssh_keypair::ssh::{
    decode_private_key, ed25519, parse_rsa_private_key, rsa, CheckInt, KeyFields, PublicKeyLine,
    AUTH_MAGIC,
};

const ED25519_PRIVATE: &str = include_str!("fixtures/ed25519_user_host");
const ED25519_PUBLIC: &str = include_str!("fixtures/ed25519_user_host.pub");
const ED25519_CHECK_INT: u32 = 0x4a92d63e;

const RSA_PRIVATE: &str = include_str!("fixtures/rsa2048_user_host");
const RSA_PUBLIC: &str = include_str!("fixtures/rsa2048_user_host.pub");
const RSA_PKCS8: &[u8] = include_bytes!("fixtures/rsa2048_pkcs8.der");
const RSA_CHECK_INT: u32 = 0x2a35a839;

fn hex32(hex: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).unwrap();
    }
    out
}

fn ed25519_fixture_keys() -> ([u8; 32], [u8; 32]) {
    (
        hex32("3a91fa1bf3d5332a9ff33ab3b7bd9ef939e4cb8aff688e42eb8077a8c8c0ca15"),
        hex32("9ce21bf3d2e964d1786182423b693254c38cbd0047e12b0919843ca2285719b1"),
    )
}

#[test]
fn ed25519_public_key_matches_ssh_keygen() {
    let (_, public) = ed25519_fixture_keys();
    assert_eq!(
        ed25519::encode_public_key(&public, "user@host"),
        ED25519_PUBLIC.trim_end()
    );
}

#[test]
fn ed25519_private_key_matches_ssh_keygen() {
    let (seed, public) = ed25519_fixture_keys();
    let encoded = ed25519::encode_private_key_with_check_int(
        &seed,
        &public,
        "user@host",
        CheckInt(ED25519_CHECK_INT),
    );
    assert_eq!(encoded, ED25519_PRIVATE);
}

#[test]
fn rsa_components_from_pkcs8() {
    let key = parse_rsa_private_key(RSA_PKCS8).unwrap();

    assert_eq!(key.e, vec![0x01, 0x00, 0x01]);
    // 2048-bit modulus with DER's sign byte
    assert_eq!(key.n.len(), 257);
    assert_eq!(key.n[0], 0x00);
    assert!(key.n[1] & 0x80 != 0);
}

#[test]
fn rsa_public_key_matches_ssh_keygen() {
    let key = parse_rsa_private_key(RSA_PKCS8).unwrap();
    assert_eq!(
        rsa::encode_public_key(&key.n, &key.e, "user@host"),
        RSA_PUBLIC.trim_end()
    );
}

#[test]
fn rsa_private_key_matches_ssh_keygen() {
    let key = parse_rsa_private_key(RSA_PKCS8).unwrap();
    let encoded =
        rsa::encode_private_key_with_check_int(&key, "user@host", CheckInt(RSA_CHECK_INT));
    assert_eq!(encoded, RSA_PRIVATE);
}

#[test]
fn rsa_private_section_order_is_n_e_d_iqmp_p_q() {
    let key = parse_rsa_private_key(RSA_PKCS8).unwrap();
    let decoded = decode_private_key(&rsa::encode_private_key(&key, "")).unwrap();

    let KeyFields::Rsa { n, e, d, iqmp, p, q } = decoded.fields else {
        panic!("expected RSA fields");
    };
    // Both sides carry at most one leading sign byte
    let strip = |v: &[u8]| v.iter().skip_while(|&&b| b == 0).copied().collect::<Vec<u8>>();
    assert_eq!(strip(&n), strip(&key.n));
    assert_eq!(strip(&e), strip(&key.e));
    assert_eq!(strip(&d), strip(&key.d));
    assert_eq!(strip(&iqmp), strip(&key.qi));
    assert_eq!(strip(&p), strip(&key.p));
    assert_eq!(strip(&q), strip(&key.q));
}

#[test]
fn fixtures_parse_with_our_decoder() {
    let ed = decode_private_key(ED25519_PRIVATE).unwrap();
    assert_eq!(ed.check_ints, (ED25519_CHECK_INT, ED25519_CHECK_INT));
    assert_eq!(ed.comment, "user@host");

    let rsa = decode_private_key(RSA_PRIVATE).unwrap();
    assert_eq!(rsa.key_type, "ssh-rsa");
    assert_eq!(rsa.check_ints, (RSA_CHECK_INT, RSA_CHECK_INT));
}

#[tokio::test]
async fn generated_ed25519_loads_in_ssh_key() {
    let pair = generate_ssh_key_pair(&SystemKeyGenerator::new(), "user@host")
        .await
        .unwrap();
    assert_eq!(pair.key_type, KeyType::Ed25519);

    let private = PrivateKey::from_openssh(&pair.private_key).unwrap();
    let public = PublicKey::from_openssh(&pair.public_key).unwrap();

    assert!(!private.is_encrypted());
    assert_eq!(private.comment(), "user@host");
    assert_eq!(private.public_key().key_data(), public.key_data());
    assert_eq!(
        public.fingerprint(HashAlg::Sha256).to_string(),
        PublicKeyLine::parse(&pair.public_key).unwrap().fingerprint()
    );
}

#[tokio::test]
async fn generated_rsa_fallback_loads_in_ssh_key() {
    let generator = SystemKeyGenerator::new().without_ed25519().with_rsa_bits(2048);
    let pair = generate_ssh_key_pair(&generator, "user@host").await.unwrap();

    assert_eq!(pair.key_type, KeyType::Rsa4096);
    assert!(pair.public_key.starts_with("ssh-rsa "));

    let private = PrivateKey::from_openssh(&pair.private_key).unwrap();
    let public = PublicKey::from_openssh(&pair.public_key).unwrap();
    assert_eq!(private.public_key().key_data(), public.key_data());
    assert_eq!(private.comment(), "user@host");
}

#[tokio::test]
async fn generated_private_key_starts_with_magic() {
    let pair = generate_ssh_key_pair(&SystemKeyGenerator::new(), "user@host")
        .await
        .unwrap();

    let body: String = pair
        .private_key
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();
    let blob = STANDARD.decode(body).unwrap();

    assert_eq!(
        &blob[..15],
        &[0x6f, 0x70, 0x65, 0x6e, 0x73, 0x73, 0x68, 0x2d, 0x6b, 0x65, 0x79, 0x2d, 0x76, 0x31, 0x00]
    );
    assert_eq!(&blob[..15], AUTH_MAGIC);
}

#[tokio::test]
async fn generated_check_ints_match_and_padding_is_canonical() {
    for comment in ["", "a", "user@host", "a much longer comment with spaces"] {
        let pair = generate_ssh_key_pair(&SystemKeyGenerator::new(), comment)
            .await
            .unwrap();
        let decoded = decode_private_key(&pair.private_key).unwrap();

        assert_eq!(decoded.check_ints.0, decoded.check_ints.1);
        assert_eq!(decoded.comment, comment);
        let expected: Vec<u8> = (1..=decoded.padding.len() as u8).collect();
        assert_eq!(decoded.padding, expected);
        assert!(decoded.padding.len() < 8);
    }
}

#[tokio::test]
async fn empty_comment_leaves_no_trailing_token() {
    let pair = generate_ssh_key_pair(&SystemKeyGenerator::new(), "")
        .await
        .unwrap();

    assert!(!pair.public_key.ends_with(' '));
    assert_eq!(pair.public_key.split(' ').count(), 2);
    assert!(pair.private_key.ends_with("-----END OPENSSH PRIVATE KEY-----\n"));
}

#[tokio::test]
async fn private_key_lines_are_at_most_70_columns() {
    let pair = generate_ssh_key_pair(&SystemKeyGenerator::new(), "user@host")
        .await
        .unwrap();

    for line in pair.private_key.lines().filter(|l| !l.starts_with("-----")) {
        assert!(line.len() <= 70);
    }
}
