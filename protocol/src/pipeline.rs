//! # Preparation Pipeline
//!
//! Glue between a merged request and a signable transaction:
//!
//! ```text
//! request ─► seed check ─► session key ─► assemble ─► resolve index ─► PreparedTransaction
//! ```
//!
//! The session key lives only for the duration of [`assemble`]. The
//! prepared transaction can still be edited (the interactive editor adds and
//! removes recipients) before [`PreparedTransaction::sign`] seals it.

use thiserror::Error;
use tracing::info;

use crate::crypto::keys::Curve;
use crate::crypto::session::SessionKey;
use crate::identity::{service_seed, AccessSeed};
use crate::network::{ClientError, LedgerClient};
use crate::transaction::{
    assemble, resolve_index, sign_transaction, AssemblyError, IndexError, MissingAccessSeed,
    SigningError, Transaction, TransactionRequest, TransactionType,
};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    MissingSeed(#[from] MissingAccessSeed),

    #[error("assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("index resolution failed: {0}")]
    Index(#[from] IndexError),

    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Transport selectors the pipeline needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareOptions {
    pub tx_type: TransactionType,
    pub curve: Curve,
}

/// An assembled transaction with its index, ready to sign.
#[derive(Debug)]
pub struct PreparedTransaction {
    pub transaction: Transaction,
    pub index: u32,
    pub curve: Curve,
    signer_seed: AccessSeed,
}

impl PreparedTransaction {
    /// Sign with the identity the transaction was prepared for.
    pub fn sign(mut self) -> Result<Transaction, PipelineError> {
        sign_transaction(
            &mut self.transaction,
            self.signer_seed.as_bytes(),
            self.index,
            self.curve,
        )?;
        Ok(self.transaction)
    }
}

/// Assemble `request` and resolve its index.
pub async fn prepare(
    request: &TransactionRequest,
    options: PrepareOptions,
    client: &dyn LedgerClient,
) -> Result<PreparedTransaction, PipelineError> {
    let seed = request.require_access_seed()?;

    let transaction = {
        let session_key = SessionKey::generate();
        assemble(request, options.tx_type, &session_key)?
    };

    let service_mode = request.is_service_mode();
    let index = resolve_index(
        request,
        request.index_supplied,
        service_mode,
        options.curve,
        client,
    )
    .await?;

    let signer_seed = if service_mode {
        service_seed(seed.as_bytes(), &request.service_name)
    } else {
        seed.clone()
    };

    info!(
        tx_type = %options.tx_type,
        curve = %options.curve,
        index,
        service_mode,
        "transaction prepared"
    );

    Ok(PreparedTransaction {
        transaction,
        index,
        curve: options.curve,
        signer_seed,
    })
}
