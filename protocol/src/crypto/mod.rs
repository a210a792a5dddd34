//! # Cryptographic Primitives
//!
//! Everything that touches key material goes through this module:
//!
//! - **AES-256-GCM** ([`encryption`]) seals ownership secrets under the
//!   transaction's session key.
//! - **X25519 + BLAKE3 KDF** ([`wrap`]) wraps that session key once per
//!   authorized public key.
//! - **Ed25519** ([`keys`]) signs transactions and doubles as an X25519
//!   identity for receiving wrapped keys.
//! - **SHA-2 / BLAKE3** ([`hash`]) for addresses and key derivation.
//!
//! These are thin wrappers around audited crates. Nothing here is novel,
//! and nothing here should become novel.

pub mod encryption;
pub mod hash;
pub mod keys;
pub mod session;
pub mod wrap;

pub use encryption::{decrypt, encrypt};
pub use hash::{derive_key, sha256, HashAlgorithm};
pub use keys::{AuthorizedPublicKey, ChainKeypair, Curve};
pub use session::SessionKey;
