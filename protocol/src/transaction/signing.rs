//! Transaction signing.
//!
//! A transaction signed at index `i` is the `i + 1`-th link of its chain:
//!
//! - `address` is the address of generation `i + 1`,
//! - `previous_public_key` is the tagged public key of generation `i`,
//! - `previous_signature` is generation `i`'s signature over
//!   [`Transaction::signable_bytes`] (which covers the new address).
//!
//! Signing is separate from assembly because the index is only known after
//! the ledger has been asked for it.

use ed25519_dalek::{Signature, Verifier};
use thiserror::Error;
use tracing::debug;

use super::builder::Transaction;
use crate::crypto::hash::HashAlgorithm;
use crate::crypto::keys::{AuthorizedPublicKey, Curve, KeyError};
use crate::identity::{derive_address, derive_keypair};

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("key derivation failed: {0}")]
    Key(#[from] KeyError),

    #[error("index {0} is the last one a chain can have")]
    IndexOverflow(u32),
}

/// Sign `tx` in place as generation `index` of the chain rooted at `seed`.
///
/// Re-signing overwrites the previous address, key and signature.
pub fn sign_transaction(
    tx: &mut Transaction,
    seed: &[u8],
    index: u32,
    curve: Curve,
) -> Result<(), SigningError> {
    let next = index
        .checked_add(1)
        .ok_or(SigningError::IndexOverflow(index))?;

    tx.address = derive_address(seed, next, curve, HashAlgorithm::default())?;

    let previous = derive_keypair(seed, index, curve)?;
    tx.previous_public_key = previous.tagged_public_key();
    tx.previous_signature = previous.sign(&tx.signable_bytes()).to_vec();

    debug!(
        address = %hex::encode(&tx.address),
        index,
        "transaction signed"
    );
    Ok(())
}

/// Check `previous_signature` against `previous_public_key`.
pub fn verify_signature(tx: &Transaction) -> bool {
    let Ok(AuthorizedPublicKey::Ed25519 { key, .. }) =
        AuthorizedPublicKey::from_bytes(&tx.previous_public_key)
    else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(&tx.previous_signature) else {
        return false;
    };
    key.verify(&tx.signable_bytes(), &signature).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
