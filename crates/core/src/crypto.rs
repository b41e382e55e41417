//! OAuth token encryption at rest (AES-256-GCM).
//!
//! Bearer tokens granted by the agencies are persisted so that a restart
//! does not force an immediate re-authentication; they are never stored
//! in plaintext. The wire format is `nonce (12 bytes) || ciphertext`.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use rand::Rng;

/// Length of the AES-GCM nonce prepended to every ciphertext.
const NONCE_LENGTH: usize = 12;

/// Errors from token encryption and decryption.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The `GOVSYNC_TOKEN_KEY` variable is unset or not valid base64.
    #[error("Invalid token key: {0}")]
    InvalidKey(String),

    /// Encryption failed (should not happen with a valid key).
    #[error("Encryption failed")]
    Encrypt,

    /// The ciphertext is truncated, corrupted, or was produced with a
    /// different key.
    #[error("Decryption failed")]
    Decrypt,
}

/// Symmetric cipher for bearer tokens stored in `government_api_tokens`.
#[derive(Clone)]
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    /// Create a cipher from a raw 256-bit key.
    pub fn new(key: &[u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Create a cipher from the `GOVSYNC_TOKEN_KEY` environment variable
    /// (base64-encoded 32-byte key).
    pub fn from_env() -> Result<Self, CryptoError> {
        let encoded = std::env::var("GOVSYNC_TOKEN_KEY")
            .map_err(|_| CryptoError::InvalidKey("GOVSYNC_TOKEN_KEY is not set".into()))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let key: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("key must be exactly 32 bytes".into()))?;
        Ok(Self::new(&key))
    }

    /// Encrypt a token. Returns `nonce || ciphertext`.
    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        rand::rng().fill(&mut nonce_bytes[..]);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::Encrypt)?;

        let mut out = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypt a `nonce || ciphertext` blob back into the token string.
    pub fn decrypt(&self, data: &[u8]) -> Result<String, CryptoError> {
        if data.len() <= NONCE_LENGTH {
            return Err(CryptoError::Decrypt);
        }
        let (nonce_bytes, ciphertext) = data.split_at(NONCE_LENGTH);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::Decrypt)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::Decrypt)
    }
}
