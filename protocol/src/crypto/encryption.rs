//! # AES-256-GCM Encryption
//!
//! The symmetric half of the ownership envelope. Every ownership secret in a
//! transaction is sealed once with the transaction's session key, and the
//! key-wrapping layer ([`super::wrap`]) reuses the same primitive under a
//! derived key.
//!
//! ## Wire format
//!
//! [`encrypt`] returns `nonce || ciphertext || tag` as one `Vec<u8>`: a
//! 12-byte random nonce, then the GCM output (ciphertext with the 16-byte
//! tag appended). [`decrypt`] expects exactly that layout.
//!
//! Nonces come from `OsRng`. A session key encrypts at most a few dozen
//! secrets before it is dropped, so random 96-bit nonces are far from the
//! birthday bound.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use thiserror::Error;

use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH, AES_TAG_LENGTH};

/// Errors from the symmetric layer.
///
/// Deliberately coarse: "wrong key" and "tampered ciphertext" look the same
/// from the outside.
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed -- wrong key or corrupted ciphertext")]
    DecryptFailed,

    #[error("ciphertext too short: must be at least {} bytes", AES_NONCE_LENGTH + AES_TAG_LENGTH)]
    CiphertextTooShort,
}

/// Seal `plaintext` under `key` with a fresh random nonce.
///
/// # Example
///
/// ```
/// use sigil_protocol::crypto::encryption::{decrypt, encrypt};
///
/// let key = [7u8; 32];
/// let sealed = encrypt(&key, b"ownership secret").unwrap();
/// assert_eq!(decrypt(&key, &sealed).unwrap(), b"ownership secret");
/// ```
pub fn encrypt(key: &[u8; AES_KEY_LENGTH], plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::EncryptFailed)?;

    let mut nonce_bytes = [0u8; AES_NONCE_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| EncryptionError::EncryptFailed)?;

    let mut out = Vec::with_capacity(AES_NONCE_LENGTH + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Open data produced by [`encrypt`].
pub fn decrypt(key: &[u8; AES_KEY_LENGTH], data: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    if data.len() < AES_NONCE_LENGTH + AES_TAG_LENGTH {
        return Err(EncryptionError::CiphertextTooShort);
    }

    let (nonce_bytes, ciphertext) = data.split_at(AES_NONCE_LENGTH);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::DecryptFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| EncryptionError::DecryptFailed)
}
