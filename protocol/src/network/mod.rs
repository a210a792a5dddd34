//! # Network Module
//!
//! Talking to the ledger service. The CLI needs exactly three things from
//! it: the length of an identity's chain, a fee estimate, and submission.
//!
//! ## Architecture
//!
//! ```text
//! client.rs - LedgerClient trait, Endpoint, response types
//! http.rs   - reqwest implementation against the ledger's HTTP API
//! ```
//!
//! ## Design Decisions
//!
//! - The pipeline only sees `&dyn LedgerClient`, so tests run the whole
//!   flow against an in-memory ledger.
//! - Network errors are surfaced unchanged. Retrying is the caller's call,
//!   and the CLI does not retry.

pub mod client;
pub mod http;

pub use client::{ClientError, Endpoint, LedgerClient, SubmissionReceipt, TransactionFee};
pub use http::HttpLedgerClient;
