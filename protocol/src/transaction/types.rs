//! Core type definitions shared by requests and assembled transactions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::UCO_DECIMALS;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// The kind of transaction being built.
///
/// The type is part of the signed payload; it does not change how the
/// request is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    KeychainAccess,
    Keychain,
    #[default]
    Transfer,
    Hosting,
    Token,
    Data,
    Contract,
    CodeProposal,
    CodeApproval,
}

impl TransactionType {
    /// Every variant, in wire-id order.
    pub const ALL: [TransactionType; 9] = [
        Self::KeychainAccess,
        Self::Keychain,
        Self::Transfer,
        Self::Hosting,
        Self::Token,
        Self::Data,
        Self::Contract,
        Self::CodeProposal,
        Self::CodeApproval,
    ];

    /// One-byte identifier used in the signable encoding.
    pub fn id(self) -> u8 {
        match self {
            Self::KeychainAccess => 254,
            Self::Keychain => 255,
            Self::Transfer => 253,
            Self::Hosting => 252,
            Self::Token => 251,
            Self::Data => 250,
            Self::Contract => 249,
            Self::CodeProposal => 5,
            Self::CodeApproval => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::KeychainAccess => "keychain_access",
            Self::Keychain => "keychain",
            Self::Transfer => "transfer",
            Self::Hosting => "hosting",
            Self::Token => "token",
            Self::Data => "data",
            Self::Contract => "contract",
            Self::CodeProposal => "code_proposal",
            Self::CodeApproval => "code_approval",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown transaction type name.
#[derive(Debug, Error)]
#[error("unknown transaction type '{0}' (expected keychain_access, keychain, transfer, hosting, token, data, contract, code_proposal or code_approval)")]
pub struct UnknownTransactionType(pub String);

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| UnknownTransactionType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// A decimal amount that cannot be carried as a fixed-point integer.
#[derive(Debug, Error, PartialEq)]
pub enum AmountError {
    #[error("amount {0} is negative")]
    Negative(f64),

    #[error("amount {0} is not a finite number")]
    NotFinite(f64),

    #[error("amount {0} is too large")]
    Overflow(f64),
}

/// Convert a decimal amount to the chain's fixed-point representation with
/// [`UCO_DECIMALS`] decimals, rounding to the nearest unit.
///
/// ```
/// use sigil_protocol::transaction::types::to_fixed_point;
///
/// assert_eq!(to_fixed_point(1.5).unwrap(), 150_000_000);
/// ```
pub fn to_fixed_point(amount: f64) -> Result<u64, AmountError> {
    if !amount.is_finite() {
        return Err(AmountError::NotFinite(amount));
    }
    if amount < 0.0 {
        return Err(AmountError::Negative(amount));
    }
    let scaled = (amount * 10f64.powi(UCO_DECIMALS as i32)).round();
    // `u64::MAX as f64` rounds up to 2^64, which is already out of range.
    if scaled >= u64::MAX as f64 {
        return Err(AmountError::Overflow(amount));
    }
    Ok(scaled as u64)
}

/// Render a fixed-point amount back as a decimal string, e.g. `1.50000000`.
pub fn display_fixed_point(value: u64) -> String {
    let divisor = 10u64.pow(UCO_DECIMALS);
    format!(
        "{}.{:0>width$}",
        value / divisor,
        value % divisor,
        width = UCO_DECIMALS as usize
    )
}
