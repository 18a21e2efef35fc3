//! Secret byte buffer that is wiped on drop
//!
//! Derived keys, key-file payloads and decrypted plaintexts are handed out
//! as `SecureBytes`:
//! 1. zeroed when dropped, including on early `?` returns
//! 2. never printed by `Debug`
//! 3. locked in memory where the platform allows it

use std::ops::{Deref, DerefMut};
use zeroize::Zeroize;

/// A secure container for sensitive bytes that automatically zeroes on drop
pub struct SecureBytes(Vec<u8>);

impl SecureBytes {
    /// Take ownership of `data`; its memory is now managed securely
    pub fn new(data: Vec<u8>) -> Self {
        let secure = Self(data);
        secure.lock_memory();
        secure
    }

    /// Create a zeroed buffer of `len` bytes, ready to be filled in place
    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0u8; len])
    }

    /// Copy `data` into a new secure buffer
    pub fn copy_from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }

    /// Lock memory to prevent swapping (best effort, may fail without privileges).
    ///
    /// Locks are per page and do not nest, so they are never released here:
    /// a small buffer usually shares its page with other live secrets.
    #[cfg(unix)]
    fn lock_memory(&self) {
        if self.0.is_empty() {
            return;
        }
        // SAFETY: the pointer/length pair describes the live allocation of `self.0`.
        unsafe {
            libc::mlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) {}

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to a regular Vec, consuming self
    /// WARNING: The returned Vec is no longer protected!
    pub fn into_vec(mut self) -> Vec<u8> {
        std::mem::take(&mut self.0)
    }
}

impl Zeroize for SecureBytes {
    fn zeroize(&mut self) {
        self.0.as_mut_slice().zeroize();
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SecureBytes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for SecureBytes {
    fn from(data: &[u8]) -> Self {
        Self::copy_from(data)
    }
}

impl Default for SecureBytes {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.0.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}
