//! # Identity Module
//!
//! Where an identity's key material comes from and how it is stretched into
//! a chain of keypairs and addresses.
//!
//! 1. **Seed**: operator input (hex/raw text or a BIP-39 phrase) resolved
//!    into an [`AccessSeed`].
//! 2. **Derivation**: per-generation keypairs and addresses, plus the seeds
//!    of named keychain services.
//!
//! Seeds never appear in logs or `Debug` output.

pub mod derivation;
pub mod seed;

pub use derivation::{derive_address, derive_keypair, service_seed};
pub use seed::{resolve_seed, AccessSeed, SeedError, SeedSource};
