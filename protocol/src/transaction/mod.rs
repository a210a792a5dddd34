//! # Transaction Module
//!
//! From operator input to a signed transaction.
//!
//! ## Architecture
//!
//! ```text
//! types.rs     - TransactionType and fixed-point amounts
//! request.rs   - TransactionRequest, the merged operator input
//! file.rs      - YAML request files
//! merge.rs     - file/flag precedence
//! ownership.rs - hybrid-encrypted ownership envelopes
//! builder.rs   - Transaction and its fluent builder, canonical bytes
//! assembler.rs - request → unsigned Transaction
//! index.rs     - which chain index to sign at
//! signing.rs   - chain address, previous key and signature
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Merge**: [`merge`] a file request with a flag request.
//! 2. **Assemble**: [`assemble`] under a fresh session key.
//! 3. **Index**: [`resolve_index`] from the request or the ledger.
//! 4. **Sign**: [`sign_transaction`] at that index.
//! 5. **Submit**: through a [`crate::network::LedgerClient`].
//!
//! ## Design Decisions
//!
//! - Amounts are decimals only in the request. Once assembled they are
//!   `u64` fixed-point with 8 decimals.
//! - The session key never leaves the assembly call that uses it.
//! - Every hex field is decoded before the first encryption, so a typo
//!   never costs a round of key wrapping.

pub mod assembler;
pub mod builder;
pub mod file;
pub mod index;
pub mod merge;
pub mod ownership;
pub mod request;
pub mod serde_hex;
pub mod signing;
pub mod types;

pub use assembler::{assemble, AssemblyError};
pub use builder::{Recipient, Transaction, TransactionBuilder, TransactionData};
pub use file::{RequestFile, RequestFileError, TransportSelectors};
pub use index::{resolve_index, IndexError};
pub use merge::merge;
pub use ownership::{coalesce_ownerships, encrypt_ownership, Ownership, OwnershipError};
pub use request::{
    MissingAccessSeed, OwnershipSpec, RecipientSpec, TokenTransferSpec, TransactionRequest,
    UcoTransferSpec,
};
pub use signing::{sign_transaction, verify_signature, SigningError};
pub use types::{to_fixed_point, AmountError, TransactionType};
