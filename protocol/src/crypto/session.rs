//! The per-transaction session key.
//!
//! One [`SessionKey`] is generated for each assembly call. It encrypts every
//! ownership secret of that transaction and is wrapped once per authorized
//! key. It is never serialized, never logged, and its bytes are zeroed when
//! it goes out of scope.

use std::fmt;

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::AES_KEY_LENGTH;

/// A single-use AES-256 key owned by one assembly.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; AES_KEY_LENGTH]);

impl SessionKey {
    /// Fresh key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; AES_KEY_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap existing key bytes. Only meant for tests and for recipients that
    /// have just unwrapped a key.
    pub fn from_bytes(bytes: [u8; AES_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; AES_KEY_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}
