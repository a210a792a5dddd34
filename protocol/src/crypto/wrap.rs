//! # Key Wrapping (ECIES over X25519)
//!
//! The asymmetric half of the ownership envelope. A transaction's session
//! key is wrapped once per authorized public key so each authorized party can
//! recover it with their own private key.
//!
//! ## Construction
//!
//! 1. Generate a fresh ephemeral X25519 secret for this wrap.
//! 2. Diffie-Hellman with the recipient's X25519 public key. A
//!    non-contributory result (low-order recipient key) is rejected.
//! 3. Derive the wrapping key with BLAKE3 `derive_key`, binding the shared
//!    secret to both public keys:
//!
//!    ```text
//!    wrap_key = BLAKE3-derive-key(
//!      context = "sigil v1 ownership key wrap",
//!      input   = shared_secret || ephemeral_pub || recipient_pub
//!    )
//!    ```
//!
//! 4. Seal the payload with AES-256-GCM under `wrap_key`.
//!
//! Output: `ephemeral_pub (32) || nonce (12) || ciphertext || tag (16)`.
//!
//! The raw DH output is never used as a key directly; it goes through the
//! KDF first.

use rand::rngs::OsRng;
use thiserror::Error;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};

use super::encryption::{self, EncryptionError};
use super::hash::derive_key;
use crate::config::{KEY_WRAP_CONTEXT, X25519_KEY_LENGTH};

/// Errors in the key-wrapping layer.
#[derive(Debug, Error)]
pub enum WrapError {
    #[error("key exchange failed: recipient public key is a low-order point")]
    NonContributory,

    #[error("wrapped key too short")]
    Truncated,

    #[error(transparent)]
    Encryption(#[from] EncryptionError),
}

/// Encrypt `payload` so only the holder of `recipient`'s secret can open it.
pub fn wrap(payload: &[u8], recipient: &PublicKey) -> Result<Vec<u8>, WrapError> {
    let ephemeral = EphemeralSecret::random_from_rng(OsRng);
    let ephemeral_public = PublicKey::from(&ephemeral);

    let shared = ephemeral.diffie_hellman(recipient);
    if !shared.was_contributory() {
        return Err(WrapError::NonContributory);
    }

    let wrap_key = derive_wrap_key(shared.as_bytes(), &ephemeral_public, recipient);
    let sealed = encryption::encrypt(&wrap_key, payload)?;

    let mut out = Vec::with_capacity(X25519_KEY_LENGTH + sealed.len());
    out.extend_from_slice(ephemeral_public.as_bytes());
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Open data produced by [`wrap`] with the recipient's static secret.
pub fn unwrap(wrapped: &[u8], secret: &StaticSecret) -> Result<Vec<u8>, WrapError> {
    if wrapped.len() < X25519_KEY_LENGTH {
        return Err(WrapError::Truncated);
    }
    let (ephemeral_bytes, sealed) = wrapped.split_at(X25519_KEY_LENGTH);

    let mut ephemeral = [0u8; X25519_KEY_LENGTH];
    ephemeral.copy_from_slice(ephemeral_bytes);
    let ephemeral_public = PublicKey::from(ephemeral);
    let own_public = PublicKey::from(secret);

    let shared = secret.diffie_hellman(&ephemeral_public);
    if !shared.was_contributory() {
        return Err(WrapError::NonContributory);
    }

    let wrap_key = derive_wrap_key(shared.as_bytes(), &ephemeral_public, &own_public);
    Ok(encryption::decrypt(&wrap_key, sealed)?)
}

fn derive_wrap_key(shared: &[u8; 32], ephemeral: &PublicKey, recipient: &PublicKey) -> [u8; 32] {
    derive_key(
        KEY_WRAP_CONTEXT,
        &[shared, ephemeral.as_bytes(), recipient.as_bytes()],
    )
}
