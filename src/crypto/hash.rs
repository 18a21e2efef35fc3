//! SHA-256 / SHA-512 digests and HMAC-SHA-256
//!
//! Every hash context is a local that is dropped before the function
//! returns. Digests that feed key derivation are returned in `Zeroizing`
//! buffers.

use hmac::digest::generic_array::GenericArray;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

use crate::error::{KeyError, Result};

pub const SHA256_LEN: usize = 32;
pub const SHA512_LEN: usize = 64;

type HmacSha256 = Hmac<Sha256>;

/// Select `count` bytes starting at `offset`, rejecting ranges outside `data`
fn sub_range(data: &[u8], offset: usize, count: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(count)
        .ok_or_else(|| KeyError::invalid_argument("offset + count overflows"))?;

    data.get(offset..end).ok_or_else(|| {
        KeyError::invalid_argument(format!(
            "range {}..{} is outside of a {}-byte buffer",
            offset,
            end,
            data.len()
        ))
    })
}

/// SHA-256 over the whole buffer
pub fn sha256(data: &[u8]) -> [u8; SHA256_LEN] {
    #[cfg(debug_assertions)]
    let snapshot = Zeroizing::new(data.to_vec());

    let mut digest = [0u8; SHA256_LEN];
    Sha256::new_with_prefix(data).finalize_into(GenericArray::from_mut_slice(&mut digest));

    #[cfg(debug_assertions)]
    {
        debug_assert_eq!(snapshot.as_slice(), data, "hash input was modified");
        debug_assert_ne!(digest, [0u8; SHA256_LEN], "all-zero SHA-256 digest");
    }

    digest
}

/// SHA-256 over `data[offset..offset + count]`
pub fn sha256_range(data: &[u8], offset: usize, count: usize) -> Result<[u8; SHA256_LEN]> {
    Ok(sha256(sub_range(data, offset, count)?))
}

/// SHA-512 over the whole buffer; the digest is wiped when dropped
pub fn sha512(data: &[u8]) -> Zeroizing<[u8; SHA512_LEN]> {
    let mut digest = Zeroizing::new([0u8; SHA512_LEN]);
    Sha512::new_with_prefix(data).finalize_into(GenericArray::from_mut_slice(&mut digest[..]));
    digest
}

/// SHA-512 over `data[offset..offset + count]`
pub fn sha512_range(
    data: &[u8],
    offset: usize,
    count: usize,
) -> Result<Zeroizing<[u8; SHA512_LEN]>> {
    Ok(sha512(sub_range(data, offset, count)?))
}

/// HMAC-SHA-256 keyed with a 64-byte digest.
///
/// 64 bytes is the SHA-256 block size, so the key is used as is.
pub fn hmac_sha256(key: &[u8; SHA512_LEN], message: &[u8]) -> Zeroizing<[u8; SHA256_LEN]> {
    let mut mac = <HmacSha256 as KeyInit>::new(GenericArray::from_slice(key));
    mac.update(message);

    let mut out = Zeroizing::new([0u8; SHA256_LEN]);
    hmac::digest::FixedOutput::finalize_into(mac, GenericArray::from_mut_slice(&mut out[..]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha512_known_vector() {
        assert_eq!(
            hex::encode(*sha512(b"abc")),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_hmac_rfc4231_case_1_shape() {
        // RFC 4231 test case 1 uses a 20-byte key; zero-padding it to the
        // 64-byte block size yields the same HMAC.
        let mut key = [0u8; SHA512_LEN];
        key[..20].copy_from_slice(&[0x0b; 20]);

        let mac = hmac_sha256(&key, b"Hi There");
        assert_eq!(
            hex::encode(*mac),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn test_range_matches_slice() {
        let data = b"0123456789abcdef";
        assert_eq!(sha256_range(data, 4, 8).unwrap(), sha256(&data[4..12]));
        assert_eq!(*sha512_range(data, 0, 16).unwrap(), *sha512(data));
        assert_eq!(sha256_range(data, 16, 0).unwrap(), sha256(b""));
    }

    #[test]
    fn test_range_out_of_bounds_is_invalid_argument() {
        let data = [0u8; 8];
        assert!(matches!(
            sha256_range(&data, 4, 5),
            Err(KeyError::InvalidArgument(_))
        ));
        assert!(matches!(
            sha512_range(&data, usize::MAX, 2),
            Err(KeyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_pure_and_distinct() {
        assert_eq!(sha256(b"one"), sha256(b"one"));
        assert_ne!(sha256(b"one"), sha256(b"two"));
        assert_eq!(*sha512(b"one"), *sha512(b"one"));
        assert_ne!(*sha512(b"one"), *sha512(b"two"));

        let key = [7u8; SHA512_LEN];
        assert_eq!(
            *hmac_sha256(&key, b"m"),
            *hmac_sha256(&key, b"m")
        );
        assert_ne!(
            *hmac_sha256(&key, b"m"),
            *hmac_sha256(&key, b"n")
        );
    }
}
