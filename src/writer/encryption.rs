//! Chunk encryption applied after compression and before framing.
//!
//! Encrypted chunk layout produced by [`XChaChaEncryptor`]:
//! ```text
//! [24 bytes: random nonce][N bytes: ciphertext][16 bytes: Poly1305 tag]
//! ```

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;

use crate::error::{Error, Result};

pub const NONCE_SIZE: usize = 24;
pub const TAG_SIZE: usize = 16;

/// Encrypts one chunk at a time. The output may be longer than the input.
pub trait Encryptor: Send {
    fn encrypt(&mut self, input: &[u8]) -> Result<Vec<u8>>;
}

pub struct XChaChaEncryptor {
    cipher: XChaCha20Poly1305,
}

impl XChaChaEncryptor {
    pub fn new(key: &[u8; 32]) -> Self {
        XChaChaEncryptor {
            cipher: XChaCha20Poly1305::new(key.into()),
        }
    }
}

impl Encryptor for XChaChaEncryptor {
    fn encrypt(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = XNonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, input)
            .map_err(|e| Error::Encryption(e.to_string()))?;

        let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }
}
