//! Key files
//!
//! A key file is a second key factor next to the master password. Reading
//! accepts every format that has been in circulation; writing always
//! produces an XML version 1.00 document.
//!
//! Formats are tried in order, first match wins:
//! 1. XML (`KeyFile/Meta/Version` + `KeyFile/Key/Data`)
//! 2. exactly 32 raw bytes
//! 3. 64 hex digits
//! 4. SHA-256 of the whole file

mod document;
mod legacy;

use std::fmt;
use std::path::Path;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto::{resize, sha256, SecureBytes};
use crate::error::{KeyError, Result};
use crate::storage::FilesProvider;

pub use document::{ENCODED_KEY_LEN, HEAD as XML_HEAD, TAIL as XML_TAIL, WRITTEN_VERSION};

/// Key length produced by every format
pub const KEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KeyFileFormat {
    Xml { version: String },
    Binary,
    Hex,
    /// Not a recognised format; the key is the file's SHA-256
    Hashed,
}

impl fmt::Display for KeyFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyFileFormat::Xml { version } => write!(f, "xml v{}", version),
            KeyFileFormat::Binary => write!(f, "binary"),
            KeyFileFormat::Hex => write!(f, "hex"),
            KeyFileFormat::Hashed => write!(f, "hashed"),
        }
    }
}

/// A parsed key file
#[derive(Debug)]
pub struct KeyFile {
    format: KeyFileFormat,
    key: SecureBytes,
}

impl KeyFile {
    /// Extract the key from key file contents
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(KeyError::InvalidKeyFile("key file is empty".to_string()));
        }

        if let Some((version, key)) = document::parse(data) {
            debug!(%version, "XML key file");
            return Ok(Self::new(KeyFileFormat::Xml { version }, key));
        }
        if let Some(key) = legacy::binary(data) {
            debug!("binary key file");
            return Ok(Self::new(KeyFileFormat::Binary, key));
        }
        if let Some(key) = legacy::hex_digits(data) {
            debug!("hex key file");
            return Ok(Self::new(KeyFileFormat::Hex, key));
        }

        warn!(len = data.len(), "unrecognised key file format, hashing contents");
        Ok(Self::new(KeyFileFormat::Hashed, legacy::hashed(data)))
    }

    /// Read and parse the key file at `path`
    pub fn load(files: &dyn FilesProvider, path: &Path) -> Result<Self> {
        let data = files.read_all(path).map_err(|e| {
            KeyError::InvalidKeyFile(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::parse(&data)
    }

    /// Generate a new key and write it to `path` as an XML key file.
    ///
    /// With `entropy` the key is `resize(entropy, 32)`; without it the key
    /// comes from the OS random source. An existing file is overwritten.
    pub fn create(
        files: &dyn FilesProvider,
        path: &Path,
        entropy: Option<&[u8]>,
    ) -> Result<Self> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        match entropy {
            Some(entropy) => key.copy_from_slice(&resize(entropy, KEY_LEN)?),
            None => OsRng.fill_bytes(&mut *key),
        }

        let doc = Self::to_xml(&key);
        files.write_all(path, doc.as_bytes())?;

        info!(path = %path.display(), "key file created");
        Ok(Self::new(
            KeyFileFormat::Xml {
                version: WRITTEN_VERSION.to_string(),
            },
            SecureBytes::copy_from(&key[..]),
        ))
    }

    /// Render `key` as an XML version 1.00 key file (CRLF, no BOM)
    pub fn to_xml(key: &[u8; KEY_LEN]) -> Zeroizing<String> {
        document::render(key)
    }

    fn new(format: KeyFileFormat, key: SecureBytes) -> Self {
        Self { format, key }
    }

    pub fn format(&self) -> &KeyFileFormat {
        &self.format
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn into_key(self) -> SecureBytes {
        self.key
    }

    /// First 4 bytes of SHA-256(key), uppercase hex. Safe to display.
    pub fn fingerprint(&self) -> String {
        hex::encode_upper(&sha256(&self.key)[..4])
    }
}
