//! AES backend report

use colored::Colorize;

use kdbx_keys::cipher::{IV_LEN, KEY_LEN};
use kdbx_keys::error::{KeyError, Result};
use kdbx_keys::{CipherPolicy, CipherRegistry};

use super::field;

pub fn run(registry: &CipherRegistry) -> Result<()> {
    let backend = registry.backend();

    let policy = match registry.policy() {
        CipherPolicy::Auto => "auto",
        CipherPolicy::PortableOnly => "portable only",
    };

    field("Policy", policy);
    field("Backend", backend.to_string().as_str().cyan());

    // Round-trip a short message through the selected backend
    let cipher = registry.cipher();
    let key = [0x42u8; KEY_LEN];
    let iv = [0x24u8; IV_LEN];
    let sample = b"kdbx-keys self-test";
    let ciphertext = cipher.encrypt(&key, &iv, sample)?;
    let plain = cipher.decrypt(&key, &iv, &ciphertext)?;

    if plain[..] != sample[..] {
        field("Self-test", "FAILED".red());
        return Err(KeyError::Cipher(format!("{} backend self-test mismatch", backend)));
    }
    field("Self-test", "ok".green());

    Ok(())
}
