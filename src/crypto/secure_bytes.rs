//! Zeroizing container for exported private key material
//!
//! Seeds and PKCS#8 exports pass through this type between key generation and
//! OpenSSH encoding. The buffer is:
//! 1. Zeroed when dropped
//! 2. Redacted in `Debug` output
//! 3. Locked in memory where the OS allows it, so it stays out of swap

use std::ops::Deref;

use zeroize::Zeroize;

pub struct SecureBytes {
    data: Vec<u8>,
    /// Length of the region handed to `mlock`, zero once released
    locked_len: usize,
}

impl SecureBytes {
    /// Take ownership of `data`; the vector is never reallocated afterwards
    pub fn new(data: Vec<u8>) -> Self {
        let locked_len = data.len();
        let secure = Self { data, locked_len };
        secure.lock_memory();
        secure
    }

    /// Best effort, fails silently without the privilege or rlimit to lock
    #[cfg(unix)]
    fn lock_memory(&self) {
        if self.locked_len == 0 {
            return;
        }
        // SAFETY: the pointer and length describe memory owned by this Vec
        unsafe {
            libc::mlock(self.data.as_ptr() as *const libc::c_void, self.locked_len);
        }
    }

    #[cfg(unix)]
    fn unlock_memory(&self) {
        if self.locked_len == 0 {
            return;
        }
        // SAFETY: same region that was passed to mlock, still owned by this Vec
        unsafe {
            libc::munlock(self.data.as_ptr() as *const libc::c_void, self.locked_len);
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) {}

    #[cfg(not(unix))]
    fn unlock_memory(&self) {}

    /// Unlock the region while its length is still known, then zero it.
    /// Returns the number of bytes unlocked.
    fn wipe(&mut self) -> usize {
        let unlocked = self.locked_len;
        self.unlock_memory();
        self.locked_len = 0;
        self.data.zeroize();
        unlocked
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for SecureBytes {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.data.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}
