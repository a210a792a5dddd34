//! # Ownership Envelopes
//!
//! An ownership is a secret embedded in a transaction that only a chosen
//! set of public keys can read. It is a hybrid envelope:
//!
//! ```text
//! secret ──AES-256-GCM(session key)──────────► cipher            (once)
//! session key ──wrap(authorized key #i)──────► encrypted key #i  (per key)
//! ```
//!
//! The secret is encrypted once no matter how many keys are authorized;
//! only the fixed-size session key is wrapped per key.
//!
//! Before encryption, request entries sharing the exact same secret bytes
//! are coalesced into one ownership ([`coalesce_ownerships`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use x25519_dalek::StaticSecret;
use zeroize::Zeroizing;

use super::request::OwnershipSpec;
use crate::config::AES_KEY_LENGTH;
use crate::crypto::encryption::{self, EncryptionError};
use crate::crypto::keys::{AuthorizedPublicKey, KeyError};
use crate::crypto::session::SessionKey;
use crate::crypto::wrap::{self, WrapError};

#[derive(Debug, Error)]
pub enum OwnershipError {
    #[error("authorized key '{key}' is not valid hex: {source}")]
    InvalidKeyHex {
        key: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("authorized key '{key}' is not usable: {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: KeyError,
    },

    #[error("failed to encrypt ownership secret")]
    Encryption(#[from] EncryptionError),

    #[error("failed to wrap session key for '{key}': {source}")]
    Wrap {
        key: String,
        #[source]
        source: WrapError,
    },

    #[error("public key is not authorized on this ownership")]
    NotAuthorized,

    #[error("failed to recover ownership secret")]
    Unwrap(#[source] WrapError),

    #[error("recovered session key has the wrong length")]
    BadSessionKey,
}

/// One authorized reader of an ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedKey {
    /// Key bytes exactly as supplied (32-byte X25519 or 34-byte tagged).
    #[serde(with = "super::serde_hex")]
    pub public_key: Vec<u8>,
    /// The session key wrapped for `public_key`.
    #[serde(with = "super::serde_hex")]
    pub encrypted_secret_key: Vec<u8>,
}

/// An encrypted secret and its authorized readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ownership {
    /// `nonce || ciphertext || tag` of the secret under the session key.
    #[serde(with = "super::serde_hex")]
    pub secret: Vec<u8>,
    pub authorized_keys: Vec<AuthorizedKey>,
}

/// Collapse entries that share the same secret bytes.
///
/// Secrets keep the order of their first appearance. Keys are appended in
/// encounter order and duplicates are kept.
pub fn coalesce_ownerships(specs: &[OwnershipSpec]) -> Vec<OwnershipSpec> {
    let mut out: Vec<OwnershipSpec> = Vec::with_capacity(specs.len());
    for spec in specs {
        match out.iter_mut().find(|o| o.secret == spec.secret) {
            Some(existing) => existing
                .authorized_keys
                .extend(spec.authorized_keys.iter().cloned()),
            None => out.push(spec.clone()),
        }
    }
    out
}

/// An ownership whose keys have been decoded but nothing encrypted yet.
///
/// Splitting parsing from sealing lets the assembler reject every bad key
/// of every ownership before doing any cryptography.
pub struct OwnershipDraft {
    secret: Zeroizing<Vec<u8>>,
    keys: Vec<(Vec<u8>, AuthorizedPublicKey)>,
}

impl OwnershipDraft {
    /// Decode the hex authorized keys of one ownership.
    pub fn parse(secret: &[u8], authorized_keys: &[String]) -> Result<Self, OwnershipError> {
        let keys = authorized_keys
            .iter()
            .map(|key| {
                let bytes = hex::decode(key).map_err(|source| OwnershipError::InvalidKeyHex {
                    key: key.clone(),
                    source,
                })?;
                let parsed = AuthorizedPublicKey::from_bytes(&bytes).map_err(|source| {
                    OwnershipError::InvalidKey {
                        key: key.clone(),
                        source,
                    }
                })?;
                Ok((bytes, parsed))
            })
            .collect::<Result<Vec<_>, OwnershipError>>()?;

        Ok(Self {
            secret: Zeroizing::new(secret.to_vec()),
            keys,
        })
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Encrypt the secret under `session_key` and wrap the key per reader.
    pub fn seal(&self, session_key: &SessionKey) -> Result<Ownership, OwnershipError> {
        let cipher = encryption::encrypt(session_key.as_bytes(), &self.secret)?;

        let authorized_keys = self
            .keys
            .iter()
            .map(|(raw, key)| {
                let encrypted_secret_key = wrap::wrap(session_key.as_bytes(), &key.x25519())
                    .map_err(|source| OwnershipError::Wrap {
                        key: hex::encode(raw),
                        source,
                    })?;
                Ok(AuthorizedKey {
                    public_key: raw.clone(),
                    encrypted_secret_key,
                })
            })
            .collect::<Result<Vec<_>, OwnershipError>>()?;

        Ok(Ownership {
            secret: cipher,
            authorized_keys,
        })
    }
}

/// Build one ownership envelope from a secret and hex authorized keys.
pub fn encrypt_ownership(
    secret: &[u8],
    authorized_keys: &[String],
    session_key: &SessionKey,
) -> Result<Ownership, OwnershipError> {
    OwnershipDraft::parse(secret, authorized_keys)?.seal(session_key)
}

impl Ownership {
    /// Recover the session key as the holder of `public_key`.
    pub fn session_key(
        &self,
        public_key: &[u8],
        secret: &StaticSecret,
    ) -> Result<SessionKey, OwnershipError> {
        let entry = self
            .authorized_keys
            .iter()
            .find(|k| k.public_key == public_key)
            .ok_or(OwnershipError::NotAuthorized)?;

        let raw = Zeroizing::new(
            wrap::unwrap(&entry.encrypted_secret_key, secret).map_err(OwnershipError::Unwrap)?,
        );
        let bytes: [u8; AES_KEY_LENGTH] = raw
            .as_slice()
            .try_into()
            .map_err(|_| OwnershipError::BadSessionKey)?;
        Ok(SessionKey::from_bytes(bytes))
    }

    /// Recover the plaintext secret as the holder of `public_key`.
    pub fn open(&self, public_key: &[u8], secret: &StaticSecret) -> Result<Vec<u8>, OwnershipError> {
        let session_key = self.session_key(public_key, secret)?;
        Ok(encryption::decrypt(session_key.as_bytes(), &self.secret)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::ChainKeypair;
    use rand::rngs::OsRng;
    use x25519_dalek::PublicKey;

    fn x25519_reader() -> (StaticSecret, String) {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        (secret, hex::encode(public.as_bytes()))
    }

    fn spec(secret: &str, keys: &[&str]) -> OwnershipSpec {
        OwnershipSpec {
            secret: secret.as_bytes().to_vec(),
            authorized_keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn coalesce_merges_identical_secrets() {
        let merged = coalesce_ownerships(&[
            spec("s1", &["k1"]),
            spec("s2", &["k3"]),
            spec("s1", &["k2"]),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].secret, b"s1");
        assert_eq!(merged[0].authorized_keys, vec!["k1", "k2"]);
        assert_eq!(merged[1].authorized_keys, vec!["k3"]);
    }

    #[test]
    fn coalesce_keeps_duplicate_keys() {
        let merged = coalesce_ownerships(&[spec("s", &["k1"]), spec("s", &["k1"])]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].authorized_keys, vec!["k1", "k1"]);
    }

    #[test]
    fn every_reader_recovers_the_secret() {
        let (alice, alice_hex) = x25519_reader();
        let (bob, bob_hex) = x25519_reader();
        let session = SessionKey::generate();

        let ownership =
            encrypt_ownership(b"top secret", &[alice_hex.clone(), bob_hex.clone()], &session)
                .unwrap();
        assert_eq!(ownership.authorized_keys.len(), 2);

        for (secret, hex_key) in [(&alice, &alice_hex), (&bob, &bob_hex)] {
            let raw = hex::decode(hex_key).unwrap();
            let recovered = ownership.session_key(&raw, secret).unwrap();
            assert_eq!(recovered.as_bytes(), session.as_bytes());
            assert_eq!(ownership.open(&raw, secret).unwrap(), b"top secret");
        }
    }

    #[test]
    fn ed25519_identity_can_read() {
        let identity = ChainKeypair::from_seed(&[9u8; 32]);
        let tagged = hex::encode(identity.tagged_public_key());
        let session = SessionKey::generate();

        let ownership = encrypt_ownership(b"for an identity", &[tagged.clone()], &session).unwrap();
        let raw = hex::decode(&tagged).unwrap();
        assert_eq!(ownership.authorized_keys[0].public_key, raw);
        assert_eq!(
            ownership.open(&raw, &identity.x25519_secret()).unwrap(),
            b"for an identity"
        );
    }

    #[test]
    fn stranger_cannot_read() {
        let (_, reader_hex) = x25519_reader();
        let (stranger, _) = x25519_reader();
        let ownership =
            encrypt_ownership(b"secret", &[reader_hex.clone()], &SessionKey::generate()).unwrap();

        let raw = hex::decode(&reader_hex).unwrap();
        assert!(ownership.open(&raw, &stranger).is_err());
        assert!(matches!(
            ownership.open(&[0u8; 32], &stranger),
            Err(OwnershipError::NotAuthorized)
        ));
    }

    #[test]
    fn invalid_hex_key_rejected() {
        let err = encrypt_ownership(b"s", &["not-hex".into()], &SessionKey::generate())
            .unwrap_err();
        match err {
            OwnershipError::InvalidKeyHex { key, .. } => assert_eq!(key, "not-hex"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wrong_length_key_rejected() {
        let err =
            encrypt_ownership(b"s", &["00ff".into()], &SessionKey::generate()).unwrap_err();
        assert!(matches!(
            err,
            OwnershipError::InvalidKey {
                source: KeyError::InvalidLength(2),
                ..
            }
        ));
    }

    #[test]
    fn cipher_is_independent_of_key_count() {
        let session = SessionKey::generate();
        let keys: Vec<String> = (0..5).map(|_| x25519_reader().1).collect();
        let one = encrypt_ownership(b"payload", &keys[..1], &session).unwrap();
        let five = encrypt_ownership(b"payload", &keys, &session).unwrap();
        assert_eq!(one.secret.len(), five.secret.len());
        assert_eq!(five.authorized_keys.len(), 5);
    }

    #[test]
    fn json_uses_camel_case_hex() {
        let ownership = Ownership {
            secret: vec![0xAA],
            authorized_keys: vec![AuthorizedKey {
                public_key: vec![0x01],
                encrypted_secret_key: vec![0x02],
            }],
        };
        let json = serde_json::to_string(&ownership).unwrap();
        assert_eq!(
            json,
            r#"{"secret":"aa","authorizedKeys":[{"publicKey":"01","encryptedSecretKey":"02"}]}"#
        );
    }
}
