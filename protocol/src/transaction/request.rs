//! The merged, ready-to-assemble transaction request.
//!
//! A request is plain data: addresses and keys are still hex strings and
//! amounts are still decimals. Nothing is validated here; the assembler
//! does that in one pass and fails on the first bad field.

use std::fmt;

use thiserror::Error;

use crate::identity::AccessSeed;

/// Raised when a request reaches the pipeline without a seed.
#[derive(Debug, Error)]
#[error("access seed configuration error, maybe you haven't passed one of the following fields: access-seed, mnemonic")]
pub struct MissingAccessSeed;

#[derive(Debug, Clone, PartialEq)]
pub struct UcoTransferSpec {
    pub to: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenTransferSpec {
    pub to: String,
    pub amount: f64,
    pub token_address: String,
    pub token_id: u64,
}

/// A recipient as entered by the operator.
///
/// With both `action` and `args_json` empty this is a plain recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientSpec {
    pub address: String,
    pub action: String,
    pub args_json: String,
}

impl RecipientSpec {
    pub fn plain(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn is_plain(&self) -> bool {
        self.action.is_empty() && self.args_json.is_empty()
    }
}

/// A secret and the hex public keys allowed to read it.
#[derive(Clone, PartialEq, Eq)]
pub struct OwnershipSpec {
    pub secret: Vec<u8>,
    pub authorized_keys: Vec<String>,
}

impl fmt::Debug for OwnershipSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnershipSpec")
            .field("secret", &format_args!("<{} bytes>", self.secret.len()))
            .field("authorized_keys", &self.authorized_keys)
            .finish()
    }
}

/// Everything needed to assemble one transaction.
///
/// `index` uses `0` both as a real value and as "unset"; whether the
/// operator actually supplied it is tracked by `index_supplied`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionRequest {
    pub access_seed: AccessSeed,
    pub index: u32,
    pub index_supplied: bool,
    pub uco_transfers: Vec<UcoTransferSpec>,
    pub token_transfers: Vec<TokenTransferSpec>,
    pub recipients: Vec<RecipientSpec>,
    pub ownerships: Vec<OwnershipSpec>,
    pub content: Vec<u8>,
    pub smart_contract: String,
    pub service_name: String,
}

impl TransactionRequest {
    /// The seed, or an error telling the operator how to provide one.
    pub fn require_access_seed(&self) -> Result<&AccessSeed, MissingAccessSeed> {
        if self.access_seed.is_empty() {
            Err(MissingAccessSeed)
        } else {
            Ok(&self.access_seed)
        }
    }

    /// Building on behalf of a named keychain service.
    pub fn is_service_mode(&self) -> bool {
        !self.service_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_seed_message_names_the_flags() {
        let request = TransactionRequest::default();
        let err = request.require_access_seed().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("access-seed"));
        assert!(msg.contains("mnemonic"));
    }

    #[test]
    fn present_seed_is_returned() {
        let request = TransactionRequest {
            access_seed: AccessSeed::new(vec![1, 2, 3]),
            ..Default::default()
        };
        assert_eq!(request.require_access_seed().unwrap().as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn plain_recipient_detection() {
        assert!(RecipientSpec::plain("00ab").is_plain());
        let named = RecipientSpec {
            address: "00ab".into(),
            action: "vote".into(),
            args_json: String::new(),
        };
        assert!(!named.is_plain());
    }

    #[test]
    fn ownership_debug_hides_secret() {
        let spec = OwnershipSpec {
            secret: b"launch codes".to_vec(),
            authorized_keys: vec!["aa".into()],
        };
        let rendered = format!("{:?}", spec);
        assert!(!rendered.contains("launch"));
        assert!(rendered.contains("<12 bytes>"));
    }

    #[test]
    fn service_mode_follows_service_name() {
        let mut request = TransactionRequest::default();
        assert!(!request.is_service_mode());
        request.service_name = "uco-wallet".into();
        assert!(request.is_service_mode());
    }
}
