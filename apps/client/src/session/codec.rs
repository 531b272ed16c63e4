//! Symmetric encoding of the session blob.
//!
//! Blob layout: base64( nonce[12] ‖ ciphertext ‖ tag[16] ), AES-256-GCM with a
//! key derived as SHA-256 of the application passphrase. The passphrase ships
//! with the client, so this protects against casual inspection only.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};

use crate::errors::CodecError;
use crate::models::Session;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Turns a session into an opaque string and back.
pub trait SessionCodec: Send + Sync {
    fn encode(&self, session: &Session) -> Result<String, CodecError>;
    fn decode(&self, blob: &str) -> Result<Session, CodecError>;
}

#[derive(Clone)]
pub struct AesGcmCodec {
    cipher: Aes256Gcm,
}

impl AesGcmCodec {
    pub fn new(passphrase: &str) -> Self {
        let key = Sha256::digest(passphrase.as_bytes());
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }
}

impl SessionCodec for AesGcmCodec {
    fn encode(&self, session: &Session) -> Result<String, CodecError> {
        let plaintext = serde_json::to_vec(session)?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_slice())
            .map_err(|e| CodecError::Encryption(e.to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(blob))
    }

    fn decode(&self, blob: &str) -> Result<Session, CodecError> {
        let bytes = STANDARD.decode(blob.trim())?;
        if bytes.len() < NONCE_LEN + TAG_LEN {
            return Err(CodecError::Truncated);
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CodecError::Decryption)?;

        let session: Session = serde_json::from_slice(&plaintext)?;
        if !session.is_complete() {
            return Err(CodecError::Incomplete);
        }
        Ok(session)
    }
}
