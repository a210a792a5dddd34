//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] collects the data of a transaction (transfers,
//! recipients, ownerships, content, code) and produces an unsigned
//! [`Transaction`]. Address and signature are filled in later by
//! [`super::signing`], once the chain index is known.

use serde::{Deserialize, Serialize};

use super::ownership::Ownership;
use super::types::TransactionType;
use crate::config::TRANSACTION_VERSION;

// ---------------------------------------------------------------------------
// Ledger movements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UcoTransfer {
    #[serde(with = "super::serde_hex")]
    pub to: Vec<u8>,
    /// Fixed-point amount, 8 decimals.
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    #[serde(with = "super::serde_hex")]
    pub to: Vec<u8>,
    pub amount: u64,
    #[serde(with = "super::serde_hex")]
    pub token_address: Vec<u8>,
    pub token_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UcoLedger {
    pub transfers: Vec<UcoTransfer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLedger {
    pub transfers: Vec<TokenTransfer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub uco: UcoLedger,
    pub token: TokenLedger,
}

// ---------------------------------------------------------------------------
// Recipients
// ---------------------------------------------------------------------------

/// A contract invoked by the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipient {
    /// Calls a named action with decoded JSON arguments.
    NamedAction {
        #[serde(with = "super::serde_hex")]
        address: Vec<u8>,
        action: String,
        args: Vec<serde_json::Value>,
    },
    /// Invokes the contract without a named action.
    Plain {
        #[serde(with = "super::serde_hex")]
        address: Vec<u8>,
    },
}

impl Recipient {
    /// Build a recipient from operator input.
    ///
    /// Empty `action` and empty `args_json` give a plain recipient. Anything
    /// else is a named action; `args_json` must then be a JSON array, or
    /// empty for no arguments.
    pub fn from_parts(
        address: Vec<u8>,
        action: &str,
        args_json: &str,
    ) -> Result<Self, serde_json::Error> {
        if action.is_empty() && args_json.is_empty() {
            return Ok(Self::Plain { address });
        }
        let args = if args_json.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str::<Vec<serde_json::Value>>(args_json)?
        };
        Ok(Self::NamedAction {
            address,
            action: action.to_string(),
            args,
        })
    }

    pub fn address(&self) -> &[u8] {
        match self {
            Self::Plain { address } | Self::NamedAction { address, .. } => address,
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// The payload of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    #[serde(with = "super::serde_hex")]
    pub content: Vec<u8>,
    /// Contract source. Empty means no code.
    pub code: String,
    pub ownerships: Vec<Ownership>,
    pub ledger: Ledger,
    pub recipients: Vec<Recipient>,
}

/// A ledger transaction.
///
/// # Canonical Byte Format
///
/// Signing uses [`Transaction::signable_bytes`]: version, address, type and
/// data, with every variable-length field prefixed by its `u32` length and
/// every integer little-endian. `previous_public_key` and
/// `previous_signature` are excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub version: u32,

    /// Address of the chain generation this transaction creates. Empty
    /// until signed.
    #[serde(with = "super::serde_hex")]
    pub address: Vec<u8>,

    #[serde(rename = "type")]
    pub tx_type: TransactionType,

    pub data: TransactionData,

    /// Curve-tagged public key of the previous generation.
    #[serde(with = "super::serde_hex")]
    pub previous_public_key: Vec<u8>,

    /// Signature of the previous generation over the signable bytes.
    #[serde(with = "super::serde_hex")]
    pub previous_signature: Vec<u8>,
}

impl Transaction {
    /// The canonical byte representation used for signing.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        buf.extend_from_slice(&self.version.to_le_bytes());
        put_bytes(&mut buf, &self.address);
        buf.push(self.tx_type.id());

        let data = &self.data;
        put_bytes(&mut buf, &data.content);
        put_bytes(&mut buf, data.code.as_bytes());

        put_len(&mut buf, data.ownerships.len());
        for ownership in &data.ownerships {
            put_bytes(&mut buf, &ownership.secret);
            put_len(&mut buf, ownership.authorized_keys.len());
            for key in &ownership.authorized_keys {
                put_bytes(&mut buf, &key.public_key);
                put_bytes(&mut buf, &key.encrypted_secret_key);
            }
        }

        put_len(&mut buf, data.ledger.uco.transfers.len());
        for transfer in &data.ledger.uco.transfers {
            put_bytes(&mut buf, &transfer.to);
            buf.extend_from_slice(&transfer.amount.to_le_bytes());
        }

        put_len(&mut buf, data.ledger.token.transfers.len());
        for transfer in &data.ledger.token.transfers {
            put_bytes(&mut buf, &transfer.to);
            buf.extend_from_slice(&transfer.amount.to_le_bytes());
            put_bytes(&mut buf, &transfer.token_address);
            buf.extend_from_slice(&transfer.token_id.to_le_bytes());
        }

        put_len(&mut buf, data.recipients.len());
        for recipient in &data.recipients {
            match recipient {
                Recipient::Plain { address } => {
                    buf.push(0x00);
                    put_bytes(&mut buf, address);
                }
                Recipient::NamedAction {
                    address,
                    action,
                    args,
                } => {
                    buf.push(0x01);
                    put_bytes(&mut buf, address);
                    put_bytes(&mut buf, action.as_bytes());
                    let encoded = serde_json::Value::Array(args.clone()).to_string();
                    put_bytes(&mut buf, encoded.as_bytes());
                }
            }
        }

        buf
    }

    /// Returns `true` once the previous generation has signed.
    pub fn is_signed(&self) -> bool {
        !self.previous_signature.is_empty()
    }

    pub fn add_recipient(&mut self, recipient: Recipient) {
        self.data.recipients.push(recipient);
    }

    /// Remove the recipient at `index`, if there is one.
    pub fn remove_recipient(&mut self, index: usize) -> Option<Recipient> {
        if index < self.data.recipients.len() {
            Some(self.data.recipients.remove(index))
        } else {
            None
        }
    }
}

fn put_len(buf: &mut Vec<u8>, len: usize) {
    buf.extend_from_slice(&(len as u32).to_le_bytes());
}

fn put_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    put_len(buf, bytes.len());
    buf.extend_from_slice(bytes);
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned [`Transaction`] instances.
///
/// ```rust
/// use sigil_protocol::transaction::{TransactionBuilder, TransactionType};
///
/// let tx = TransactionBuilder::new(TransactionType::Transfer)
///     .uco_transfer(vec![0x00, 0xAA], 150_000_000)
///     .content(b"hello".to_vec())
///     .build();
///
/// assert!(!tx.is_signed());
/// assert_eq!(tx.data.ledger.uco.transfers.len(), 1);
/// ```
pub struct TransactionBuilder {
    version: u32,
    tx_type: TransactionType,
    data: TransactionData,
}

impl TransactionBuilder {
    pub fn new(tx_type: TransactionType) -> Self {
        Self {
            version: TRANSACTION_VERSION,
            tx_type,
            data: TransactionData::default(),
        }
    }

    /// Sets the format version. Only needed for testing version upgrades.
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn uco_transfer(mut self, to: Vec<u8>, amount: u64) -> Self {
        self.data.ledger.uco.transfers.push(UcoTransfer { to, amount });
        self
    }

    pub fn token_transfer(
        mut self,
        to: Vec<u8>,
        amount: u64,
        token_address: Vec<u8>,
        token_id: u64,
    ) -> Self {
        self.data.ledger.token.transfers.push(TokenTransfer {
            to,
            amount,
            token_address,
            token_id,
        });
        self
    }

    pub fn recipient(mut self, recipient: Recipient) -> Self {
        self.data.recipients.push(recipient);
        self
    }

    pub fn ownership(mut self, ownership: Ownership) -> Self {
        self.data.ownerships.push(ownership);
        self
    }

    pub fn content(mut self, content: Vec<u8>) -> Self {
        self.data.content = content;
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.data.code = code.into();
        self
    }

    /// Consumes the builder and produces an unsigned [`Transaction`].
    pub fn build(self) -> Transaction {
        Transaction {
            version: self.version,
            address: Vec::new(),
            tx_type: self.tx_type,
            data: self.data,
            previous_public_key: Vec::new(),
            previous_signature: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
