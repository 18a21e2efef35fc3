//! OpenSSL-backed AES-256-CBC

use openssl::symm::{self, Cipher, Crypter, Mode};

use super::{BlockCipher, CipherBackend, IV_LEN, KEY_LEN};
use crate::crypto::SecureBytes;
use crate::error::{KeyError, Result};

#[derive(Debug)]
pub struct OpensslAes(());

impl OpensslAes {
    /// Builds a throwaway cipher context to make sure the library is usable
    pub fn new() -> Result<Self> {
        Crypter::new(
            Cipher::aes_256_cbc(),
            Mode::Encrypt,
            &[0u8; KEY_LEN],
            Some(&[0u8; IV_LEN][..]),
        )
        .map_err(|e| KeyError::CipherUnavailable(e.to_string()))?;

        Ok(Self(()))
    }
}

impl BlockCipher for OpensslAes {
    fn backend(&self) -> CipherBackend {
        CipherBackend::Accelerated
    }

    fn encrypt(
        &self,
        key: &[u8; KEY_LEN],
        iv: &[u8; IV_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        symm::encrypt(Cipher::aes_256_cbc(), key, Some(&iv[..]), plaintext)
            .map_err(|e| KeyError::Cipher(e.to_string()))
    }

    fn decrypt(
        &self,
        key: &[u8; KEY_LEN],
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
    ) -> Result<SecureBytes> {
        symm::decrypt(Cipher::aes_256_cbc(), key, Some(&iv[..]), ciphertext)
            .map(SecureBytes::new)
            .map_err(|e| KeyError::Cipher(e.to_string()))
    }
}
