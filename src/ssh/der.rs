//! Minimal DER reader for PKCS#8-wrapped RSA private keys
//!
//! Only the handful of tags that appear in a PKCS#8 `PrivateKeyInfo` holding an
//! `RSAPrivateKey` are understood. This is not a general ASN.1 parser, but
//! every read is bounds-checked so malformed input fails with a `DerError`.

use thiserror::Error;

use super::rsa::RsaKeyComponents;

const TAG_INTEGER: u8 = 0x02;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_SEQUENCE: u8 = 0x30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DerError {
    #[error("unexpected end of DER data at offset {offset}")]
    Truncated { offset: usize },

    #[error("expected tag {expected:#04x} at offset {offset}, found {found:#04x}")]
    UnexpectedTag { offset: usize, expected: u8, found: u8 },

    #[error("unsupported DER length encoding at offset {offset}")]
    InvalidLength { offset: usize },
}

/// One INTEGER read from a DER buffer
#[derive(Debug, PartialEq, Eq)]
pub struct DerInteger<'a> {
    /// Big-endian content octets, exactly as encoded (sign byte included)
    pub value: &'a [u8],
    pub next_offset: usize,
}

/// Read an INTEGER TLV starting at `offset`
pub fn parse_der_integer(bytes: &[u8], offset: usize) -> Result<DerInteger<'_>, DerError> {
    let (start, len) = read_header(bytes, offset, TAG_INTEGER)?;
    let value = take(bytes, start, len)?;
    Ok(DerInteger {
        value,
        next_offset: start + len,
    })
}

/// Extract the RSA components from a PKCS#8 `PrivateKeyInfo` DER blob
///
/// ```text
/// PrivateKeyInfo ::= SEQUENCE {
///     version             INTEGER,
///     privateKeyAlgorithm AlgorithmIdentifier,   -- skipped
///     privateKey          OCTET STRING {
///         RSAPrivateKey ::= SEQUENCE {
///             version, n, e, d, p, q, dp, dq, qi  -- all INTEGER
///         }
///     }
/// }
/// ```
pub fn parse_rsa_private_key(pkcs8: &[u8]) -> Result<RsaKeyComponents, DerError> {
    let (offset, _) = read_header(pkcs8, 0, TAG_SEQUENCE)?;
    let offset = parse_der_integer(pkcs8, offset)?.next_offset;

    let (algorithm_start, algorithm_len) = read_header(pkcs8, offset, TAG_SEQUENCE)?;
    let offset = algorithm_start + algorithm_len;

    let (offset, _) = read_header(pkcs8, offset, TAG_OCTET_STRING)?;
    let (offset, _) = read_header(pkcs8, offset, TAG_SEQUENCE)?;
    let mut offset = parse_der_integer(pkcs8, offset)?.next_offset;

    let mut next = || -> Result<Vec<u8>, DerError> {
        let integer = parse_der_integer(pkcs8, offset)?;
        offset = integer.next_offset;
        Ok(integer.value.to_vec())
    };

    Ok(RsaKeyComponents {
        n: next()?,
        e: next()?,
        d: next()?,
        p: next()?,
        q: next()?,
        dp: next()?,
        dq: next()?,
        qi: next()?,
    })
}

/// Check the tag at `offset` and decode the length that follows it.
/// Returns `(content_offset, content_len)`.
fn read_header(bytes: &[u8], offset: usize, expected: u8) -> Result<(usize, usize), DerError> {
    let found = *bytes.get(offset).ok_or(DerError::Truncated { offset })?;
    if found != expected {
        return Err(DerError::UnexpectedTag {
            offset,
            expected,
            found,
        });
    }

    let length_offset = offset + 1;
    let first = *bytes
        .get(length_offset)
        .ok_or(DerError::Truncated {
            offset: length_offset,
        })?;

    if first & 0x80 == 0 {
        return Ok((length_offset + 1, first as usize));
    }

    // Long form: low 7 bits give the number of length octets.
    // 0x80 (indefinite) is not valid DER.
    let count = (first & 0x7f) as usize;
    if count == 0 || count > std::mem::size_of::<u32>() {
        return Err(DerError::InvalidLength {
            offset: length_offset,
        });
    }

    let len = take(bytes, length_offset + 1, count)?
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize);

    Ok((length_offset + 1 + count, len))
}

fn take(bytes: &[u8], start: usize, len: usize) -> Result<&[u8], DerError> {
    start
        .checked_add(len)
        .and_then(|end| bytes.get(start..end))
        .ok_or(DerError::Truncated {
            offset: bytes.len().min(start),
        })
}
