//! Turning a merged request into an unsigned transaction.
//!
//! Assembly is a pure translation step: no network I/O, no shared state.
//! Every address and key is decoded before the first encryption runs, and
//! the first invalid field aborts the whole assembly.

use thiserror::Error;
use tracing::debug;

use super::builder::{Recipient, Transaction, TransactionBuilder};
use super::ownership::{coalesce_ownerships, OwnershipDraft, OwnershipError};
use super::request::TransactionRequest;
use super::types::{to_fixed_point, AmountError, TransactionType};
use crate::crypto::session::SessionKey;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("{field}: '{value}' is not valid hex: {source}")]
    InvalidHex {
        field: String,
        value: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("{field}: {source}")]
    InvalidAmount {
        field: String,
        #[source]
        source: AmountError,
    },

    #[error("recipient {address}: invalid arguments '{args_json}': {source}")]
    InvalidArguments {
        address: String,
        args_json: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Ownership(#[from] OwnershipError),
}

/// Assemble `request` into an unsigned transaction of type `tx_type`.
///
/// `session_key` encrypts every ownership secret of this transaction and is
/// owned by the caller.
pub fn assemble(
    request: &TransactionRequest,
    tx_type: TransactionType,
    session_key: &SessionKey,
) -> Result<Transaction, AssemblyError> {
    let mut builder = TransactionBuilder::new(tx_type);

    for (i, transfer) in request.uco_transfers.iter().enumerate() {
        let field = format!("uco transfer #{} to", i + 1);
        let to = decode_hex(&field, &transfer.to)?;
        let amount = to_fixed_point(transfer.amount)
            .map_err(|source| AssemblyError::InvalidAmount { field, source })?;
        builder = builder.uco_transfer(to, amount);
    }

    for (i, transfer) in request.token_transfers.iter().enumerate() {
        let to = decode_hex(&format!("token transfer #{} to", i + 1), &transfer.to)?;
        let token_address = decode_hex(
            &format!("token transfer #{} token address", i + 1),
            &transfer.token_address,
        )?;
        let amount =
            to_fixed_point(transfer.amount).map_err(|source| AssemblyError::InvalidAmount {
                field: format!("token transfer #{} amount", i + 1),
                source,
            })?;
        builder = builder.token_transfer(to, amount, token_address, transfer.token_id);
    }

    for (i, spec) in request.recipients.iter().enumerate() {
        let address = decode_hex(&format!("recipient #{} address", i + 1), &spec.address)?;
        let recipient =
            Recipient::from_parts(address, &spec.action, &spec.args_json).map_err(|source| {
                AssemblyError::InvalidArguments {
                    address: spec.address.clone(),
                    args_json: spec.args_json.clone(),
                    source,
                }
            })?;
        builder = builder.recipient(recipient);
    }

    let drafts = coalesce_ownerships(&request.ownerships)
        .iter()
        .map(|spec| OwnershipDraft::parse(&spec.secret, &spec.authorized_keys))
        .collect::<Result<Vec<_>, _>>()?;
    let authorized_keys: usize = drafts.iter().map(OwnershipDraft::key_count).sum();
    for draft in &drafts {
        builder = builder.ownership(draft.seal(session_key)?);
    }

    let tx = builder
        .content(request.content.clone())
        .code(request.smart_contract.clone())
        .build();

    debug!(
        tx_type = %tx_type,
        uco_transfers = tx.data.ledger.uco.transfers.len(),
        token_transfers = tx.data.ledger.token.transfers.len(),
        recipients = tx.data.recipients.len(),
        ownerships = tx.data.ownerships.len(),
        authorized_keys,
        content_len = tx.data.content.len(),
        code_len = tx.data.code.len(),
        "transaction assembled"
    );

    Ok(tx)
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, AssemblyError> {
    hex::decode(value).map_err(|source| AssemblyError::InvalidHex {
        field: field.to_string(),
        value: value.to_string(),
        source,
    })
}
