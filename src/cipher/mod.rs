//! AES-256-CBC backend selection
//!
//! Two implementations exist:
//! - `Accelerated`: the system OpenSSL library (AES-NI where the CPU has it).
//!   Compiled only on Unix hosts with the `openssl` cargo feature.
//! - `Portable`: the pure-Rust `aes` + `cbc` crates, always available.
//!
//! Windows builds never probe the accelerated path; the database engine
//! there uses its own native primitive for the expensive key transforms.
//!
//! The first call to [`CipherRegistry::backend`] decides which one to use
//! and the answer is kept for the lifetime of the registry.

#[cfg(all(unix, feature = "openssl"))]
mod accelerated;
mod portable;

use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::debug;

use crate::crypto::SecureBytes;
use crate::error::Result;

pub use portable::PortableAes;

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// CBC initialization vector length in bytes
pub const IV_LEN: usize = 16;

/// AES-256-CBC with PKCS#7 padding
pub trait BlockCipher: Send + Sync {
    /// Which implementation is behind this handle
    fn backend(&self) -> CipherBackend;

    fn encrypt(&self, key: &[u8; KEY_LEN], iv: &[u8; IV_LEN], plaintext: &[u8])
        -> Result<Vec<u8>>;

    fn decrypt(
        &self,
        key: &[u8; KEY_LEN],
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
    ) -> Result<SecureBytes>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherBackend {
    Accelerated,
    Portable,
}

impl fmt::Display for CipherBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherBackend::Accelerated => write!(f, "accelerated"),
            CipherBackend::Portable => write!(f, "portable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherPolicy {
    /// Try the accelerated backend where it is compiled in, else portable
    #[default]
    Auto,
    /// Never probe; always use the portable backend
    PortableOnly,
}

/// Holds the once-computed backend decision
#[derive(Debug)]
pub struct CipherRegistry {
    policy: CipherPolicy,
    choice: OnceLock<CipherBackend>,
}

static GLOBAL_REGISTRY: CipherRegistry = CipherRegistry::new(CipherPolicy::Auto);

impl CipherRegistry {
    pub const fn new(policy: CipherPolicy) -> Self {
        Self {
            policy,
            choice: OnceLock::new(),
        }
    }

    /// Process-wide registry with the [`CipherPolicy::Auto`] policy
    pub fn global() -> &'static CipherRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn policy(&self) -> CipherPolicy {
        self.policy
    }

    /// The backend in use, probing on first call only
    pub fn backend(&self) -> CipherBackend {
        *self.choice.get_or_init(|| self.select())
    }

    /// Construct a cipher handle for the selected backend
    pub fn cipher(&self) -> Box<dyn BlockCipher> {
        if self.backend() == CipherBackend::Accelerated {
            match create_accelerated() {
                Ok(cipher) => return cipher,
                Err(e) => debug!(error = %e, "accelerated AES vanished, using portable"),
            }
        }
        Box::new(PortableAes)
    }

    fn select(&self) -> CipherBackend {
        if self.policy == CipherPolicy::PortableOnly {
            debug!("portable AES forced by policy");
            return CipherBackend::Portable;
        }

        match create_accelerated() {
            Ok(_) => {
                debug!("using accelerated AES");
                CipherBackend::Accelerated
            }
            Err(e) => {
                debug!(error = %e, "accelerated AES unavailable, using portable");
                CipherBackend::Portable
            }
        }
    }
}

impl Default for CipherRegistry {
    fn default() -> Self {
        Self::new(CipherPolicy::Auto)
    }
}

#[cfg(all(unix, feature = "openssl"))]
fn create_accelerated() -> Result<Box<dyn BlockCipher>> {
    Ok(Box::new(accelerated::OpensslAes::new()?))
}

#[cfg(not(all(unix, feature = "openssl")))]
fn create_accelerated() -> Result<Box<dyn BlockCipher>> {
    Err(crate::error::KeyError::CipherUnavailable(
        "not built for this host".to_string(),
    ))
}
