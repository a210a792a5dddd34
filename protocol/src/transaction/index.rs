//! Choosing the chain index a transaction is signed at.

use thiserror::Error;
use tracing::debug;

use super::request::TransactionRequest;
use crate::config::GENESIS_GENERATION;
use crate::crypto::hash::HashAlgorithm;
use crate::crypto::keys::{Curve, KeyError};
use crate::identity::derive_address;
use crate::network::{ClientError, LedgerClient};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("cannot derive genesis address: {0}")]
    Derivation(#[from] KeyError),

    #[error("cannot look up chain index: {0}")]
    Lookup(#[from] ClientError),
}

/// Resolve the index for `request`.
///
/// In order:
/// 1. `explicitly_set`: the request's index, even when it is `0`.
/// 2. `service_mode`: the request's index, no lookup. Service identities
///    are not keyed by the seed's own genesis address.
/// 3. Otherwise, ask `client` for the length of the chain rooted at the
///    seed's genesis address.
pub async fn resolve_index(
    request: &TransactionRequest,
    explicitly_set: bool,
    service_mode: bool,
    curve: Curve,
    client: &dyn LedgerClient,
) -> Result<u32, IndexError> {
    if explicitly_set {
        debug!(index = request.index, "using supplied index");
        return Ok(request.index);
    }
    if service_mode {
        debug!(index = request.index, "service mode, skipping index lookup");
        return Ok(request.index);
    }

    let genesis = derive_address(
        request.access_seed.as_bytes(),
        GENESIS_GENERATION,
        curve,
        HashAlgorithm::default(),
    )?;
    let address_hex = hex::encode(genesis);
    let index = client.last_transaction_index(&address_hex).await?;
    debug!(address = %address_hex, index, "index looked up");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AccessSeed;
    use crate::network::{SubmissionReceipt, TransactionFee};
    use crate::transaction::Transaction;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingClient {
        chain_length: u32,
        lookups: AtomicUsize,
        last_address: Mutex<Option<String>>,
    }

    #[async_trait]
    impl LedgerClient for CountingClient {
        async fn last_transaction_index(&self, address_hex: &str) -> Result<u32, ClientError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            *self.last_address.lock().unwrap() = Some(address_hex.to_string());
            Ok(self.chain_length)
        }

        async fn transaction_fee(&self, _tx: &Transaction) -> Result<TransactionFee, ClientError> {
            Ok(TransactionFee::default())
        }

        async fn send_transaction(
            &self,
            _tx: &Transaction,
        ) -> Result<SubmissionReceipt, ClientError> {
            unreachable!("index resolution never submits")
        }
    }

    fn request(index: u32) -> TransactionRequest {
        TransactionRequest {
            access_seed: AccessSeed::new(b"seed".to_vec()),
            index,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn explicit_zero_is_returned_without_lookup() {
        let client = CountingClient {
            chain_length: 9,
            ..Default::default()
        };
        let index = resolve_index(&request(0), true, false, Curve::Ed25519, &client)
            .await
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(client.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn service_mode_skips_lookup() {
        let client = CountingClient {
            chain_length: 9,
            ..Default::default()
        };
        let index = resolve_index(&request(2), false, true, Curve::Ed25519, &client)
            .await
            .unwrap();
        assert_eq!(index, 2);
        assert_eq!(client.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn lookup_uses_genesis_address() {
        let client = CountingClient {
            chain_length: 5,
            ..Default::default()
        };
        let index = resolve_index(&request(0), false, false, Curve::Ed25519, &client)
            .await
            .unwrap();
        assert_eq!(index, 5);
        assert_eq!(client.lookups.load(Ordering::SeqCst), 1);

        let expected = derive_address(b"seed", 0, Curve::Ed25519, HashAlgorithm::Sha256).unwrap();
        assert_eq!(
            client.last_address.lock().unwrap().as_deref(),
            Some(hex::encode(expected).as_str())
        );
    }

    #[tokio::test]
    async fn unsupported_curve_fails_before_lookup() {
        let client = CountingClient::default();
        let result = resolve_index(&request(0), false, false, Curve::P256, &client).await;
        assert!(matches!(result, Err(IndexError::Derivation(_))));
        assert_eq!(client.lookups.load(Ordering::SeqCst), 0);
    }
}
