//! Pre-XML key files
//!
//! Tried in order once the XML reading has failed:
//! 1. exactly 32 raw bytes
//! 2. 64 hex digits (surrounding ASCII whitespace ignored, any case)
//! 3. anything else: SHA-256 of the whole file

use zeroize::Zeroizing;

use super::KEY_LEN;
use crate::crypto::{sha256, SecureBytes};

pub(super) fn binary(data: &[u8]) -> Option<SecureBytes> {
    (data.len() == KEY_LEN).then(|| SecureBytes::copy_from(data))
}

pub(super) fn hex_digits(data: &[u8]) -> Option<SecureBytes> {
    let text = trim_ascii(data);
    if text.len() != KEY_LEN * 2 {
        return None;
    }

    let mut key = SecureBytes::zeroed(KEY_LEN);
    hex::decode_to_slice(text, &mut key).ok()?;
    Some(key)
}

pub(super) fn hashed(data: &[u8]) -> SecureBytes {
    let digest = Zeroizing::new(sha256(data));
    SecureBytes::copy_from(&digest[..])
}

fn trim_ascii(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    let end = data
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &data[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_needs_exact_length() {
        assert_eq!(&*binary(&[9u8; 32]).unwrap(), &[9u8; 32]);
        assert!(binary(&[9u8; 31]).is_none());
        assert!(binary(&[9u8; 33]).is_none());
    }

    #[test]
    fn test_hex_is_case_insensitive_and_trimmed() {
        let lower = "ab".repeat(32);
        let upper = format!("  {}\r\n", "AB".repeat(32));
        assert_eq!(&*hex_digits(lower.as_bytes()).unwrap(), &[0xABu8; 32]);
        assert_eq!(&*hex_digits(upper.as_bytes()).unwrap(), &[0xABu8; 32]);
    }

    #[test]
    fn test_hex_rejects_bad_input() {
        assert!(hex_digits("0".repeat(63).as_bytes()).is_none());
        assert!(hex_digits("zz".repeat(32).as_bytes()).is_none());
        assert!(hex_digits(b"").is_none());
    }

    #[test]
    fn test_trim_ascii() {
        assert_eq!(trim_ascii(b" \t a b \n"), b"a b");
        assert_eq!(trim_ascii(b"   "), b"");
        assert_eq!(trim_ascii(b""), b"");
    }
}
