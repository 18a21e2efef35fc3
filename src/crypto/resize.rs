//! Key resizing
//!
//! Derives a key of any length from arbitrary input:
//! - up to 32 bytes: prefix of SHA-256(input)
//! - 33..=64 bytes: prefix of SHA-512(input)
//! - more than 64 bytes: HMAC-SHA-256 keyed with SHA-512(input) over a
//!   little-endian 64-bit block counter, concatenated and truncated
//!
//! The intermediate digest lives in a `Zeroizing` buffer and is wiped on
//! every return path.

use tracing::trace;
use zeroize::Zeroizing;

use super::hash::{self, SHA256_LEN, SHA512_LEN};
use super::SecureBytes;
use crate::error::Result;

/// Resize `input[offset..offset + count]` to exactly `target_len` bytes
pub fn resize_key(
    input: &[u8],
    offset: usize,
    count: usize,
    target_len: usize,
) -> Result<SecureBytes> {
    if target_len == 0 {
        return Ok(SecureBytes::default());
    }

    if target_len <= SHA256_LEN {
        let seed = Zeroizing::new(hash::sha256_range(input, offset, count)?);
        return Ok(SecureBytes::copy_from(&seed[..target_len]));
    }

    let seed = hash::sha512_range(input, offset, count)?;
    if target_len <= SHA512_LEN {
        return Ok(SecureBytes::copy_from(&seed[..target_len]));
    }

    let mut out = SecureBytes::zeroed(target_len);
    // The counter cannot wrap: that would take 2^64 blocks of output.
    let mut counter: u64 = 0;
    for chunk in out.chunks_mut(SHA256_LEN) {
        let block = hash::hmac_sha256(&seed, &counter.to_le_bytes());
        chunk.copy_from_slice(&block[..chunk.len()]);
        counter += 1;
    }

    debug_assert_ne!(*seed, [0u8; SHA512_LEN]);
    trace!(target_len, blocks = counter, "expanded key with HMAC-SHA-256");

    Ok(out)
}

/// Resize the whole of `input` to exactly `target_len` bytes
pub fn resize(input: &[u8], target_len: usize) -> Result<SecureBytes> {
    resize_key(input, 0, input.len(), target_len)
}
