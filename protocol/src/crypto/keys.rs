//! # Key Management
//!
//! Keypairs for chain identities and the public keys that ownerships are
//! encrypted for.
//!
//! Two encodings of public keys show up on the wire:
//!
//! - **Curve-tagged** (34 bytes): `curve_id || origin_id || key`. This is how
//!   identities publish their keys and how `previous_public_key` is written.
//! - **Raw X25519** (32 bytes): a bare Montgomery point, for parties that
//!   only ever receive encrypted secrets.
//!
//! Ed25519 keys can receive encrypted secrets too: the Edwards point is
//! mapped to its Montgomery form, and the holder of the signing key derives
//! the matching X25519 secret from the same seed.
//!
//! Key bytes are never logged.

use std::fmt;
use std::str::FromStr;

use curve25519_dalek::montgomery::MontgomeryPoint;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use x25519_dalek::StaticSecret;

use crate::config::{SOFTWARE_ORIGIN_ID, TAGGED_KEY_LENGTH, X25519_KEY_LENGTH};

/// Errors that can occur during key operations.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid public key length: {0} bytes (expected 32 or 34)")]
    InvalidLength(usize),

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("unsupported curve id {0}: only ED25519 keys are supported")]
    UnsupportedCurveId(u8),

    #[error("unsupported curve {0}: only ED25519 keys can be derived")]
    UnsupportedCurve(Curve),

    #[error("unknown elliptic curve '{0}' (expected ED25519, P256 or SECP256K1)")]
    UnknownCurve(String),
}

// ---------------------------------------------------------------------------
// Curve
// ---------------------------------------------------------------------------

/// Elliptic curves an identity can be configured with.
///
/// Only [`Curve::Ed25519`] can be derived and signed with locally. The
/// others are accepted at the configuration boundary so a file written for
/// another signer still parses, and fail when keys are actually needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Curve {
    #[default]
    #[serde(rename = "ED25519")]
    Ed25519,
    #[serde(rename = "P256")]
    P256,
    #[serde(rename = "SECP256K1")]
    Secp256k1,
}

impl Curve {
    /// One-byte identifier used in tagged keys and addresses.
    pub fn id(self) -> u8 {
        match self {
            Self::Ed25519 => 0,
            Self::P256 => 1,
            Self::Secp256k1 => 2,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "ED25519"),
            Self::P256 => write!(f, "P256"),
            Self::Secp256k1 => write!(f, "SECP256K1"),
        }
    }
}

impl FromStr for Curve {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ED25519" => Ok(Self::Ed25519),
            "P256" => Ok(Self::P256),
            "SECP256K1" => Ok(Self::Secp256k1),
            _ => Err(KeyError::UnknownCurve(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ChainKeypair
// ---------------------------------------------------------------------------

/// The keypair of one generation of an identity's chain.
///
/// Built from a 32-byte derived seed (see [`crate::identity::derivation`]).
/// Does not implement `Serialize`: exporting private keys should never
/// happen by accident.
pub struct ChainKeypair {
    signing_key: SigningKey,
}

impl ChainKeypair {
    /// Build a keypair from 32 bytes of derived key material.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// The raw Ed25519 public key.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The curve-tagged public key, as written into `previous_public_key`.
    pub fn tagged_public_key(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(TAGGED_KEY_LENGTH);
        out.push(Curve::Ed25519.id());
        out.push(SOFTWARE_ORIGIN_ID);
        out.extend_from_slice(&self.public_key_bytes());
        out
    }

    /// Sign `message`, returning the 64-byte Ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Verify a signature produced by [`ChainKeypair::sign`].
    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> bool {
        let sig = Signature::from_bytes(signature);
        self.signing_key
            .verifying_key()
            .verify(message, &sig)
            .is_ok()
    }

    /// The X25519 secret matching [`AuthorizedPublicKey::x25519`] of this
    /// keypair's Ed25519 public key. Used to unwrap ownership keys.
    pub fn x25519_secret(&self) -> StaticSecret {
        StaticSecret::from(self.signing_key.to_scalar_bytes())
    }
}

impl fmt::Debug for ChainKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainKeypair")
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// AuthorizedPublicKey
// ---------------------------------------------------------------------------

/// A public key an ownership secret is encrypted for.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthorizedPublicKey {
    /// A bare 32-byte X25519 key.
    X25519([u8; X25519_KEY_LENGTH]),
    /// A curve-tagged Ed25519 key; `origin` is carried for display only.
    Ed25519 { origin: u8, key: VerifyingKey },
}

impl AuthorizedPublicKey {
    /// Parse the decoded bytes of an authorized key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        match bytes.len() {
            X25519_KEY_LENGTH => {
                let mut key = [0u8; X25519_KEY_LENGTH];
                key.copy_from_slice(bytes);
                Ok(Self::X25519(key))
            }
            TAGGED_KEY_LENGTH => {
                let curve_id = bytes[0];
                if curve_id != Curve::Ed25519.id() {
                    return Err(KeyError::UnsupportedCurveId(curve_id));
                }
                let mut raw = [0u8; 32];
                raw.copy_from_slice(&bytes[2..]);
                let key =
                    VerifyingKey::from_bytes(&raw).map_err(|_| KeyError::InvalidPublicKey)?;
                Ok(Self::Ed25519 {
                    origin: bytes[1],
                    key,
                })
            }
            other => Err(KeyError::InvalidLength(other)),
        }
    }

    /// The Montgomery-form key used for the X25519 exchange.
    pub fn x25519(&self) -> x25519_dalek::PublicKey {
        match self {
            Self::X25519(bytes) => x25519_dalek::PublicKey::from(*bytes),
            Self::Ed25519 { key, .. } => {
                let point: MontgomeryPoint = key.to_montgomery();
                x25519_dalek::PublicKey::from(point.to_bytes())
            }
        }
    }
}

impl fmt::Debug for AuthorizedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X25519(bytes) => write!(f, "X25519({})", hex::encode(bytes)),
            Self::Ed25519 { origin, key } => {
                write!(f, "Ed25519(origin={}, {})", origin, hex::encode(key.to_bytes()))
            }
        }
    }
}
