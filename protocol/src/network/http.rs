//! [`LedgerClient`] over the ledger's HTTP API.
//!
//! | Call                     | Request                                      |
//! |--------------------------|----------------------------------------------|
//! | `last_transaction_index` | `POST /api` GraphQL `lastTransaction`        |
//! | `transaction_fee`        | `POST /api/transaction_fee` (transaction)    |
//! | `send_transaction`       | `POST /api/transaction` (transaction)        |
//!
//! Failures are returned as-is; nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::client::{ClientError, Endpoint, LedgerClient, SubmissionReceipt, TransactionFee};
use crate::config::HTTP_TIMEOUT_SECS;
use crate::transaction::Transaction;

pub struct HttpLedgerClient {
    client: Client,
    endpoint: Endpoint,
}

#[derive(Serialize)]
struct GraphqlQuery {
    query: String,
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LastTransactionData {
    last_transaction: Option<ChainLength>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChainLength {
    chain_length: u32,
}

impl HttpLedgerClient {
    pub fn new(endpoint: Endpoint) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|source| ClientError::Http {
                url: endpoint.to_string(),
                source,
            })?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint.url(path);
        debug!(%url, "POST");

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|source| ClientError::Http {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}

fn last_transaction_query(address_hex: &str) -> GraphqlQuery {
    GraphqlQuery {
        query: format!(
            "query {{ lastTransaction(address: \"{}\") {{ chainLength }} }}",
            address_hex
        ),
    }
}

fn is_not_found(error: &GraphqlError) -> bool {
    let message = error.message.to_ascii_lowercase();
    message.contains("not_exists") || message.contains("not found")
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn last_transaction_index(&self, address_hex: &str) -> Result<u32, ClientError> {
        let resp: GraphqlResponse<LastTransactionData> = self
            .post_json("/api", &last_transaction_query(address_hex))
            .await?;

        if let Some(last) = resp.data.and_then(|d| d.last_transaction) {
            return Ok(last.chain_length);
        }
        match resp.errors.iter().find(|e| !is_not_found(e)) {
            Some(error) => Err(ClientError::Decode {
                url: self.endpoint.url("/api"),
                reason: error.message.clone(),
            }),
            None => Ok(0),
        }
    }

    async fn transaction_fee(&self, tx: &Transaction) -> Result<TransactionFee, ClientError> {
        self.post_json("/api/transaction_fee", tx).await
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<SubmissionReceipt, ClientError> {
        let receipt: SubmissionReceipt = self.post_json("/api/transaction", tx).await?;
        info!(
            address = %receipt.transaction_address,
            status = %receipt.status,
            "transaction submitted"
        );
        Ok(receipt)
    }
}
