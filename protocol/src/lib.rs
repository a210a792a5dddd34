// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Sigil Protocol Core Library
//!
//! Everything `sigil` needs to turn operator input into a signed ledger
//! transaction: a request file and a handful of flags go in, a transaction
//! with encrypted ownerships and a valid chain signature comes out.
//!
//! Ed25519 for chain keys, X25519 for key wrapping, AES-256-GCM for the
//! secrets themselves, BLAKE3 for every derivation. No custom primitives.
//!
//! ## Architecture
//!
//! - **config**: Protocol constants: lengths, contexts, decimals.
//! - **crypto**: Symmetric encryption, key wrapping, keys, hashes.
//! - **identity**: Seeds, and the chain of keys derived from them.
//! - **transaction**: Requests, merge rules, assembly, ownerships, signing.
//! - **network**: The ledger client seam and its HTTP implementation.
//! - **pipeline**: Request to prepared transaction, in one call.
//!
//! ## Design Philosophy
//!
//! 1. Fail on the first bad field, and say which field it was.
//! 2. Secrets never reach a log line or a `Debug` impl.
//! 3. Nothing is persisted. A process run is one transaction.

pub mod config;
pub mod crypto;
pub mod identity;
pub mod network;
pub mod pipeline;
pub mod transaction;
