//! RSA keys in OpenSSH format
//!
//! Field order differs between the two halves of the format:
//! the public blob carries `e, n` while the private section carries
//! `n, e, d, iqmp, p, q`. `dp` and `dq` are not stored; OpenSSH recomputes them.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::private_key::{begin_private_section, seal, CheckInt};
use super::public_key::format_line;
use super::wire::SshWriter;

pub const ALGORITHM: &str = "ssh-rsa";

/// Modulus size used for generated keys
pub const KEY_BITS: usize = 4096;

/// Public exponent used for generated keys (65537)
pub const PUBLIC_EXPONENT: u64 = 0x10001;

/// RSA private key components as big-endian unsigned integers
///
/// Values may carry the leading `0x00` sign byte DER puts on integers with the
/// high bit set; `mpint` encoding normalises it. `n = p * q` is trusted, not
/// checked.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RsaKeyComponents {
    pub n: Vec<u8>,
    pub e: Vec<u8>,
    pub d: Vec<u8>,
    pub p: Vec<u8>,
    pub q: Vec<u8>,
    /// d mod (p - 1)
    pub dp: Vec<u8>,
    /// d mod (q - 1)
    pub dq: Vec<u8>,
    /// q^-1 mod p
    pub qi: Vec<u8>,
}

impl std::fmt::Debug for RsaKeyComponents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaKeyComponents")
            .field("n_len", &self.n.len())
            .field("e", &self.e)
            .field("private", &"[REDACTED]")
            .finish()
    }
}

/// Public key blob: `string("ssh-rsa") ++ mpint(e) ++ mpint(n)`
pub fn public_blob(n: &[u8], e: &[u8]) -> Vec<u8> {
    let mut blob = SshWriter::with_capacity(4 + ALGORITHM.len() + 4 + e.len() + 5 + n.len());
    blob.write_string(ALGORITHM).write_mpint(e).write_mpint(n);
    blob.into_bytes()
}

/// `ssh-rsa <base64> [comment]`
pub fn encode_public_key(n: &[u8], e: &[u8], comment: &str) -> String {
    format_line(ALGORITHM, &public_blob(n, e), comment)
}

/// Armored OpenSSH v1 private key with a fresh random check-int
pub fn encode_private_key(key: &RsaKeyComponents, comment: &str) -> String {
    encode_private_key_with_check_int(key, comment, CheckInt::random())
}

/// Same as [`encode_private_key`] with a caller-supplied check-int
pub fn encode_private_key_with_check_int(
    key: &RsaKeyComponents,
    comment: &str,
    check: CheckInt,
) -> String {
    let mut section = begin_private_section(check, ALGORITHM);
    section
        .write_mpint(&key.n)
        .write_mpint(&key.e)
        .write_mpint(&key.d)
        .write_mpint(&key.qi)
        .write_mpint(&key.p)
        .write_mpint(&key.q)
        .write_string(comment);

    seal(&public_blob(&key.n, &key.e), section)
}
