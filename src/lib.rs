//! kdbx-keys - key-derivation building blocks for a KeePass-compatible database
//!
//! This crate provides:
//! - SHA-256 / SHA-512 / HMAC-SHA-256 digests over whole buffers or sub-ranges
//! - Resizing of arbitrary key material to any key length
//! - AES-256-CBC with a once-per-process choice between an accelerated and
//!   a portable backend
//! - Reading every historical key file format and writing XML key files
//! - Sealing small secrets under an application shared secret

pub mod cipher;
pub mod crypto;
pub mod error;
pub mod keyfile;
pub mod storage;

pub use cipher::{BlockCipher, CipherBackend, CipherPolicy, CipherRegistry};
pub use crypto::{resize, resize_key, SecureBytes};
pub use error::{KeyError, Result};
pub use keyfile::{KeyFile, KeyFileFormat};
pub use storage::{FilesProvider, LocalFiles};
