//! Shared-secret sealing
//!
//! Protects small strings and blobs with a key derived from an
//! application-wide shared secret:
//! - key: PBKDF2-HMAC-SHA1, 1000 rounds, 32 bytes
//! - cipher: AES-256-CBC with PKCS#7 padding from the [`CipherRegistry`]
//!
//! Sealed layout:
//! [4 bytes: IV length (i32 LE), always 16][16 bytes: IV][N bytes: ciphertext]
//!
//! String variants base64 the sealed layout.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use sha1::Sha1;
use zeroize::Zeroizing;

use super::SecureBytes;
use crate::cipher::{BlockCipher, CipherRegistry, IV_LEN, KEY_LEN};
use crate::error::{KeyError, Result};

pub const PBKDF2_ROUNDS: u32 = 1000;

/// PBKDF2 rejects shorter salts
pub const MIN_SALT_LEN: usize = 8;

const PREFIX_LEN: usize = 4;

pub struct Sealer {
    key: Zeroizing<[u8; KEY_LEN]>,
    cipher: Box<dyn BlockCipher>,
}

impl Sealer {
    pub fn new(shared_secret: &str, salt: &[u8], registry: &CipherRegistry) -> Result<Self> {
        if shared_secret.is_empty() {
            return Err(KeyError::invalid_argument("shared secret is empty"));
        }
        if salt.len() < MIN_SALT_LEN {
            return Err(KeyError::invalid_argument(format!(
                "salt must be at least {} bytes, got {}",
                MIN_SALT_LEN,
                salt.len()
            )));
        }

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2::pbkdf2_hmac::<Sha1>(shared_secret.as_bytes(), salt, PBKDF2_ROUNDS, &mut *key);

        Ok(Self {
            key,
            cipher: registry.cipher(),
        })
    }

    pub fn seal_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = self.cipher.encrypt(&self.key, &iv, data)?;

        let mut sealed = Vec::with_capacity(PREFIX_LEN + IV_LEN + ciphertext.len());
        sealed.extend_from_slice(&(IV_LEN as i32).to_le_bytes());
        sealed.extend_from_slice(&iv);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    pub fn open_bytes(&self, sealed: &[u8]) -> Result<SecureBytes> {
        if sealed.len() < PREFIX_LEN + IV_LEN {
            return Err(KeyError::Decryption);
        }

        let (prefix, rest) = sealed.split_at(PREFIX_LEN);
        let iv_len = i32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
        if iv_len != IV_LEN as i32 {
            return Err(KeyError::Decryption);
        }

        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&rest[..IV_LEN]);

        self.cipher
            .decrypt(&self.key, &iv, &rest[IV_LEN..])
            .map_err(|_| KeyError::Decryption)
    }

    pub fn seal_str(&self, text: &str) -> Result<String> {
        if text.is_empty() {
            return Err(KeyError::invalid_argument("text to seal is empty"));
        }
        Ok(STANDARD.encode(self.seal_bytes(text.as_bytes())?))
    }

    pub fn open_str(&self, sealed: &str) -> Result<Zeroizing<String>> {
        if sealed.is_empty() {
            return Err(KeyError::invalid_argument("sealed text is empty"));
        }
        let raw = STANDARD
            .decode(sealed.trim())
            .map_err(|e| KeyError::invalid_argument(format!("sealed text is not base64: {}", e)))?;

        let plain = self.open_bytes(&raw)?.into_vec();
        String::from_utf8(plain)
            .map(Zeroizing::new)
            .map_err(|e| {
                let mut bytes = e.into_bytes();
                zeroize::Zeroize::zeroize(&mut bytes);
                KeyError::Decryption
            })
    }
}

impl std::fmt::Debug for Sealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sealer")
            .field("backend", &self.cipher.backend())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::CipherPolicy;

    const SALT: &[u8] = b"kdbx-keys-test-salt";

    fn sealer(secret: &str) -> Sealer {
        Sealer::new(secret, SALT, &CipherRegistry::new(CipherPolicy::PortableOnly)).unwrap()
    }

    #[test]
    fn test_bytes_roundtrip() {
        let s = sealer("SharedSecret");
        let data = b"\x00\x01binary payload\xff";

        let sealed = s.seal_bytes(data).unwrap();
        assert_eq!(&sealed[..4], &16i32.to_le_bytes());
        assert_eq!(sealed.len(), 4 + 16 + 32);
        assert_eq!(&*s.open_bytes(&sealed).unwrap(), data);
    }

    #[test]
    fn test_string_roundtrip() {
        let s = sealer("SharedSecret");
        let sealed = s.seal_str("database password").unwrap();
        assert_eq!(s.open_str(&sealed).unwrap().as_str(), "database password");
    }

    #[test]
    fn test_opens_blob_sealed_elsewhere() {
        // PBKDF2-HMAC-SHA1 x1000 and AES-256-CBC computed outside this crate,
        // IV 00 01 .. 0f
        let sealed = "EAAAAAABAgMEBQYHCAkKCwwNDg9EOjVzE21H4+RqAnk0zlmzopSoKsXlu3ufB+VK2jLZLA==";

        let raw = STANDARD.decode(sealed).unwrap();
        assert_eq!(&raw[..4], &16i32.to_le_bytes());
        assert_eq!(&raw[4..20], &std::array::from_fn::<u8, 16, _>(|i| i as u8));

        let s = sealer("SharedSecret");
        assert_eq!(s.open_str(sealed).unwrap().as_str(), "database password");

        let global = Sealer::new("SharedSecret", SALT, CipherRegistry::global()).unwrap();
        assert_eq!(&*global.open_bytes(&raw).unwrap(), b"database password");
    }

    #[test]
    fn test_fresh_iv_per_seal() {
        let s = sealer("SharedSecret");
        assert_ne!(s.seal_str("same").unwrap(), s.seal_str("same").unwrap());
    }

    #[test]
    fn test_same_secret_and_salt_interoperate() {
        let sealed = sealer("SharedSecret").seal_bytes(b"payload").unwrap();
        let global = Sealer::new("SharedSecret", SALT, CipherRegistry::global()).unwrap();
        assert_eq!(&*global.open_bytes(&sealed).unwrap(), b"payload");
    }

    #[test]
    fn test_wrong_secret_does_not_reveal_plaintext() {
        let data = b"attack at dawn, bring snacks";
        let sealed = sealer("right").seal_bytes(data).unwrap();
        match sealer("wrong").open_bytes(&sealed) {
            Err(e) => assert!(matches!(e, KeyError::Decryption)),
            Ok(plain) => assert_ne!(&*plain, data),
        }
    }

    #[test]
    fn test_corrupted_prefix_fails() {
        let s = sealer("SharedSecret");
        let mut sealed = s.seal_bytes(b"payload").unwrap();
        sealed[0] = 8;
        assert!(matches!(s.open_bytes(&sealed), Err(KeyError::Decryption)));
        assert!(matches!(s.open_bytes(&sealed[..10]), Err(KeyError::Decryption)));
    }

    #[test]
    fn test_invalid_arguments() {
        let registry = CipherRegistry::default();
        assert!(matches!(
            Sealer::new("", SALT, &registry),
            Err(KeyError::InvalidArgument(_))
        ));
        assert!(matches!(
            Sealer::new("secret", b"short", &registry),
            Err(KeyError::InvalidArgument(_))
        ));

        let s = sealer("SharedSecret");
        assert!(matches!(s.seal_str(""), Err(KeyError::InvalidArgument(_))));
        assert!(matches!(s.open_str(""), Err(KeyError::InvalidArgument(_))));
        assert!(matches!(
            s.open_str("not base64!"),
            Err(KeyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let printed = format!("{:?}", sealer("SharedSecret"));
        assert!(printed.contains("REDACTED"));
    }
}
