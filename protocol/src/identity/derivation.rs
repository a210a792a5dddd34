//! Deterministic key and address derivation.
//!
//! An identity's chain is a sequence of generations. Generation `i` has its
//! own keypair derived from the access seed, and the transaction signed at
//! generation `i` lives at the address of generation `i + 1`:
//!
//! ```text
//! chain_seed(i) = BLAKE3-derive-key("sigil v1 chain key", seed || i_be_u32)
//! keypair(i)    = Ed25519(chain_seed(i))
//! address(i)    = curve_id || hash_id || H(tagged_public_key(i))
//! ```

use crate::config::{CHAIN_KEY_CONTEXT, SERVICE_DERIVATION_PATH, SERVICE_SEED_CONTEXT};
use crate::crypto::hash::{derive_key, HashAlgorithm};
use crate::crypto::keys::{ChainKeypair, Curve, KeyError};

use super::seed::AccessSeed;

/// Derive the keypair of generation `index`.
pub fn derive_keypair(seed: &[u8], index: u32, curve: Curve) -> Result<ChainKeypair, KeyError> {
    match curve {
        Curve::Ed25519 => {
            let chain_seed = derive_key(CHAIN_KEY_CONTEXT, &[seed, &index.to_be_bytes()]);
            Ok(ChainKeypair::from_seed(&chain_seed))
        }
        other => Err(KeyError::UnsupportedCurve(other)),
    }
}

/// Derive the address of generation `index`.
pub fn derive_address(
    seed: &[u8],
    index: u32,
    curve: Curve,
    hash: HashAlgorithm,
) -> Result<Vec<u8>, KeyError> {
    let keypair = derive_keypair(seed, index, curve)?;
    let digest = hash.digest(&keypair.tagged_public_key());

    let mut address = Vec::with_capacity(2 + digest.len());
    address.push(curve.id());
    address.push(hash.id());
    address.extend_from_slice(&digest);
    Ok(address)
}

/// Seed of a named keychain service, derived from the access seed.
///
/// Service identities never share keys with the access seed's own chain,
/// which is why their index is managed by the keychain rather than looked
/// up from the seed's address.
pub fn service_seed(seed: &[u8], service_name: &str) -> AccessSeed {
    let path = SERVICE_DERIVATION_PATH.replace("{service}", service_name);
    AccessSeed::new(derive_key(SERVICE_SEED_CONTEXT, &[seed, path.as_bytes()]).to_vec())
}
