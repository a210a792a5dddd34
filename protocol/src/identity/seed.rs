//! Access seed resolution.
//!
//! An identity is rooted in an access seed: opaque bytes from which every
//! key of its chain is derived. Operators supply it either as text (hex or
//! raw) or as a BIP-39 phrase.

use std::fmt;

use bip39::{Language, Mnemonic};
use thiserror::Error;
use zeroize::Zeroizing;

/// Errors while turning operator input into seed bytes.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid mnemonic phrase: {0}")]
    InvalidMnemonic(String),

    #[error("access seed is empty")]
    Empty,
}

/// Where the seed comes from.
pub enum SeedSource<'a> {
    /// `--access-seed` / `access_seed:`. Hex when it decodes as hex, raw
    /// UTF-8 bytes otherwise.
    AccessSeed(&'a str),
    /// A BIP-39 English phrase. The seed is the phrase's entropy.
    Mnemonic(&'a str),
}

/// Secret seed bytes. Zeroed on drop, redacted in `Debug`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccessSeed(Zeroizing<Vec<u8>>);

impl AccessSeed {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for AccessSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("AccessSeed(<empty>)")
        } else {
            f.write_str("AccessSeed(<redacted>)")
        }
    }
}

/// Resolve operator input into seed bytes.
pub fn resolve_seed(source: SeedSource<'_>) -> Result<AccessSeed, SeedError> {
    match source {
        SeedSource::AccessSeed(text) => {
            if text.is_empty() {
                return Err(SeedError::Empty);
            }
            Ok(AccessSeed::new(maybe_decode_hex(text)))
        }
        SeedSource::Mnemonic(phrase) => {
            let mnemonic = Mnemonic::parse_in(Language::English, phrase.trim())
                .map_err(|e| SeedError::InvalidMnemonic(e.to_string()))?;
            Ok(AccessSeed::new(mnemonic.to_entropy()))
        }
    }
}

/// Hex-decode `text` when it is valid hex, otherwise take its bytes as-is.
pub fn maybe_decode_hex(text: &str) -> Vec<u8> {
    hex::decode(text).unwrap_or_else(|_| text.as_bytes().to_vec())
}
