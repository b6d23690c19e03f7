//! SSH wire-format primitives
//!
//! Everything in the OpenSSH key formats is built from three pieces:
//! - `uint32`: 4 bytes, big-endian
//! - `string`: `uint32` length followed by that many raw bytes
//! - `mpint`: a `string` holding a two's-complement big-endian integer
//!
//! `SshWriter` and `SshReader` keep all offset arithmetic in one place so the
//! encoders above them only ever say *what* to write.

use thiserror::Error;

/// Errors produced while reading SSH wire data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("unexpected end of data: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}

/// Encode `data` as an SSH `string`
pub fn ssh_string(data: impl AsRef<[u8]>) -> Vec<u8> {
    let mut writer = SshWriter::new();
    writer.write_string(data);
    writer.into_bytes()
}

/// Encode an unsigned big-endian integer as an SSH `mpint`
///
/// Leading zero bytes are stripped (keeping at least one byte), and a single
/// `0x00` is prepended when the high bit of the first byte is set so the
/// value is never read back as negative.
pub fn ssh_mpint(bytes: &[u8]) -> Vec<u8> {
    let mut writer = SshWriter::new();
    writer.write_mpint(bytes);
    writer.into_bytes()
}

/// Growable big-endian byte builder
#[derive(Debug, Default, Clone)]
pub struct SshWriter {
    buf: Vec<u8>,
}

impl SshWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Raw bytes, no length prefix
    pub fn write_bytes(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        self.buf.extend_from_slice(data.as_ref());
        self
    }

    pub fn write_string(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        let data = data.as_ref();
        self.write_u32(data.len() as u32);
        self.write_bytes(data)
    }

    pub fn write_mpint(&mut self, bytes: &[u8]) -> &mut Self {
        let first_nonzero = bytes.iter().position(|&b| b != 0);
        let trimmed: &[u8] = match first_nonzero {
            Some(start) => &bytes[start..],
            // All zero (or empty): keep a single zero byte
            None => &[0u8],
        };

        if trimmed[0] & 0x80 != 0 {
            self.write_u32(trimmed.len() as u32 + 1);
            self.buf.push(0x00);
            self.write_bytes(trimmed)
        } else {
            self.write_string(trimmed)
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over SSH wire data
#[derive(Debug, Clone)]
pub struct SshReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SshReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Take exactly `len` raw bytes
    pub fn read_raw(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        let available = self.data.len() - self.pos;
        if len > available {
            return Err(WireError::Truncated {
                needed: len,
                available,
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        let raw = self.read_raw(4)?;
        Ok(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    /// Length-prefixed byte string
    pub fn read_bytes(&mut self) -> Result<&'a [u8], WireError> {
        let len = self.read_u32()? as usize;
        self.read_raw(len)
    }

    /// Length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> Result<&'a str, WireError> {
        let bytes = self.read_bytes()?;
        std::str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8)
    }

    /// `mpint` body with any sign-padding zero byte removed
    pub fn read_mpint(&mut self) -> Result<&'a [u8], WireError> {
        let bytes = self.read_bytes()?;
        match bytes {
            [0, rest @ ..] if !rest.is_empty() => Ok(rest),
            _ => Ok(bytes),
        }
    }
}
