//! Cryptographic primitives for kdbx-keys
//!
//! This module provides:
//! - SHA-256 / SHA-512 / HMAC-SHA-256 digests
//! - Key resizing to any output length
//! - Shared-secret sealing on top of the selected AES backend
//! - Secure memory handling with automatic zeroing

pub mod hash;
mod resize;
mod seal;
mod secure_bytes;

pub use hash::{hmac_sha256, sha256, sha256_range, sha512, sha512_range};
pub use resize::{resize, resize_key};
pub use seal::{Sealer, MIN_SALT_LEN, PBKDF2_ROUNDS};
pub use secure_bytes::SecureBytes;
