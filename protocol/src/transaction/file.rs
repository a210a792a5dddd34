//! Declarative request files (YAML).
//!
//! A request file mirrors [`TransactionRequest`] plus the transport
//! selectors (endpoint, curve, transaction type). Every key is optional and
//! unknown keys are rejected, so a typo fails loudly instead of silently
//! producing a different transaction.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::request::{
    OwnershipSpec, RecipientSpec, TokenTransferSpec, TransactionRequest, UcoTransferSpec,
};
use super::types::TransactionType;
use crate::crypto::keys::Curve;
use crate::identity::seed::maybe_decode_hex;
use crate::identity::AccessSeed;

#[derive(Debug, Error)]
pub enum RequestFileError {
    #[error("failed to read request file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed request file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("recipient {address}: arguments cannot be encoded as JSON: {source}")]
    Arguments {
        address: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Transport selectors a file may carry. `None` means "not in the file".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportSelectors {
    pub endpoint: Option<String>,
    pub elliptic_curve: Option<Curve>,
    pub transaction_type: Option<TransactionType>,
}

/// A loaded request file.
#[derive(Debug, Clone, Default)]
pub struct RequestFile {
    pub request: TransactionRequest,
    pub transport: TransportSelectors,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRequestFile {
    endpoint: Option<String>,
    access_seed: Option<String>,
    index: Option<u32>,
    elliptic_curve: Option<Curve>,
    transaction_type: Option<TransactionType>,
    #[serde(default)]
    uco_transfers: Vec<RawUcoTransfer>,
    #[serde(default)]
    token_transfers: Vec<RawTokenTransfer>,
    #[serde(default)]
    recipients: Vec<RawRecipient>,
    #[serde(default)]
    ownerships: Vec<RawOwnership>,
    content: Option<String>,
    smart_contract: Option<String>,
    service_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUcoTransfer {
    to: String,
    amount: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTokenTransfer {
    to: String,
    amount: f64,
    token_address: String,
    #[serde(default)]
    token_id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecipient {
    address: String,
    action: Option<String>,
    args: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOwnership {
    secret: String,
    #[serde(default)]
    authorized_keys: Vec<String>,
}

/// Read and parse a request file from disk.
pub fn load(path: &Path) -> Result<RequestFile, RequestFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| RequestFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = parse(&text)?;
    debug!(path = %path.display(), "request file loaded");
    Ok(file)
}

/// Parse request file text.
pub fn parse(text: &str) -> Result<RequestFile, RequestFileError> {
    if text.trim().is_empty() {
        return Ok(RequestFile::default());
    }
    let raw: RawRequestFile = serde_yaml::from_str(text)?;

    let recipients = raw
        .recipients
        .into_iter()
        .map(recipient_spec)
        .collect::<Result<Vec<_>, _>>()?;

    let request = TransactionRequest {
        access_seed: raw
            .access_seed
            .filter(|s| !s.is_empty())
            .map(|s| AccessSeed::new(maybe_decode_hex(&s)))
            .unwrap_or_default(),
        index: raw.index.unwrap_or(0),
        // Only `--index` pins the index; a file index yields to the ledger.
        index_supplied: false,
        uco_transfers: raw
            .uco_transfers
            .into_iter()
            .map(|t| UcoTransferSpec {
                to: t.to,
                amount: t.amount,
            })
            .collect(),
        token_transfers: raw
            .token_transfers
            .into_iter()
            .map(|t| TokenTransferSpec {
                to: t.to,
                amount: t.amount,
                token_address: t.token_address,
                token_id: t.token_id,
            })
            .collect(),
        recipients,
        ownerships: raw
            .ownerships
            .into_iter()
            .map(|o| OwnershipSpec {
                secret: o.secret.into_bytes(),
                authorized_keys: o.authorized_keys,
            })
            .collect(),
        content: raw.content.map(String::into_bytes).unwrap_or_default(),
        smart_contract: raw.smart_contract.unwrap_or_default(),
        service_name: raw.service_name.unwrap_or_default(),
    };

    Ok(RequestFile {
        request,
        transport: TransportSelectors {
            endpoint: raw.endpoint,
            elliptic_curve: raw.elliptic_curve,
            transaction_type: raw.transaction_type,
        },
    })
}

fn recipient_spec(raw: RawRecipient) -> Result<RecipientSpec, RequestFileError> {
    let args_json = match (&raw.action, &raw.args) {
        (_, Some(args)) => {
            serde_json::to_string(args).map_err(|source| RequestFileError::Arguments {
                address: raw.address.clone(),
                source,
            })?
        }
        (Some(_), None) => "[]".to_string(),
        (None, None) => String::new(),
    };
    Ok(RecipientSpec {
        address: raw.address,
        action: raw.action.unwrap_or_default(),
        args_json,
    })
}
