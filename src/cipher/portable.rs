//! Pure-Rust AES-256-CBC (RustCrypto `aes` + `cbc`)

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::{BlockCipher, CipherBackend, IV_LEN, KEY_LEN};
use crate::crypto::SecureBytes;
use crate::error::{KeyError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Portable fallback, available on every target
#[derive(Debug, Clone, Copy, Default)]
pub struct PortableAes;

impl BlockCipher for PortableAes {
    fn backend(&self) -> CipherBackend {
        CipherBackend::Portable
    }

    fn encrypt(
        &self,
        key: &[u8; KEY_LEN],
        iv: &[u8; IV_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        Ok(Aes256CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    fn decrypt(
        &self,
        key: &[u8; KEY_LEN],
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
    ) -> Result<SecureBytes> {
        Aes256CbcDec::new(key.into(), iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map(SecureBytes::new)
            .map_err(|_| KeyError::Cipher("invalid PKCS#7 padding".to_string()))
    }
}
