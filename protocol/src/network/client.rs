//! The ledger service as seen by the CLI.
//!
//! Three calls are needed to get a transaction on chain: the length of an
//! identity's chain (to pick the next index), a fee estimate, and the
//! submission itself. [`LedgerClient`] is the seam; the HTTP implementation
//! lives in [`super::http`] and tests substitute an in-memory one.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{LOCAL_ENDPOINT_URL, MAINNET_ENDPOINT_URL, TESTNET_ENDPOINT_URL};
use crate::transaction::Transaction;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid endpoint '{0}': expected local, testnet, mainnet or an http(s):// URL")]
    InvalidEndpoint(String),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("ledger returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Where the ledger API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
}

impl Endpoint {
    pub fn local() -> Self {
        Self {
            base_url: LOCAL_ENDPOINT_URL.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` joined with `path` (which starts with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::local()
    }
}

impl FromStr for Endpoint {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let alias = match trimmed.to_ascii_lowercase().as_str() {
            "local" => Some(LOCAL_ENDPOINT_URL),
            "testnet" => Some(TESTNET_ENDPOINT_URL),
            "mainnet" => Some(MAINNET_ENDPOINT_URL),
            _ => None,
        };
        if let Some(base_url) = alias {
            return Ok(Self {
                base_url: base_url.to_string(),
            });
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Self {
                base_url: trimmed.trim_end_matches('/').to_string(),
            });
        }
        Err(ClientError::InvalidEndpoint(s.to_string()))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url)
    }
}

/// Fee estimate for a transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFee {
    /// Fixed-point fee in the chain's native unit.
    pub fee: u64,
    /// Exchange rates of the native unit, keyed by currency code.
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
}

/// What the ledger answers to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub status: String,
    pub transaction_address: String,
}

#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Length of the chain whose genesis address is `address_hex`, which is
    /// also the next usable index. Unknown chains have length `0`.
    async fn last_transaction_index(&self, address_hex: &str) -> Result<u32, ClientError>;

    async fn transaction_fee(&self, tx: &Transaction) -> Result<TransactionFee, ClientError>;

    async fn send_transaction(&self, tx: &Transaction) -> Result<SubmissionReceipt, ClientError>;
}
