use thiserror::Error;

pub type Result<T> = std::result::Result<T, KeyError>;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid key file: {0}")]
    InvalidKeyFile(String),

    /// Only produced while probing cipher backends; never returned from
    /// [`crate::cipher::CipherRegistry::cipher`].
    #[error("Cipher backend unavailable: {0}")]
    CipherUnavailable(String),

    #[error("Cipher operation failed: {0}")]
    Cipher(String),

    #[error("Decryption failed: data is corrupted or the shared secret is wrong")]
    Decryption,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KeyError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        KeyError::InvalidArgument(msg.into())
    }
}
