//! # Protocol Configuration & Constants
//!
//! Every fixed parameter used while assembling, encrypting and signing a
//! transaction lives here. If a number shows up in two modules, it belongs
//! in this file instead.
//!
//! Runtime configuration (endpoint, curve, transaction type) is not global
//! state: the CLI resolves it once into a `TransportConfig` value and passes
//! it down explicitly.

// ---------------------------------------------------------------------------
// Transaction Format
// ---------------------------------------------------------------------------

/// Version stamped on every assembled transaction.
pub const TRANSACTION_VERSION: u32 = 1;

/// Number of decimals of the chain's fixed-point amounts. `1.5` UCO is
/// carried on the wire as `150_000_000`.
pub const UCO_DECIMALS: u32 = 8;

/// Generation used to derive the canonical address of an identity when
/// looking up the last index of its chain.
pub const GENESIS_GENERATION: u32 = 0;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// AES-256-GCM key length in bytes. Also the length of the per-transaction
/// session key that encrypts ownership secrets.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce length in bytes. 96 bits, the standard GCM nonce size.
pub const AES_NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const AES_TAG_LENGTH: usize = 16;

/// X25519 public key length in bytes.
pub const X25519_KEY_LENGTH: usize = 32;

/// Ed25519 public key length in bytes.
pub const ED25519_KEY_LENGTH: usize = 32;

/// Length of a curve-tagged public key: `curve_id || origin_id || key`.
pub const TAGGED_KEY_LENGTH: usize = 2 + ED25519_KEY_LENGTH;

/// Origin byte written into keys derived locally from a seed ("software" origin).
pub const SOFTWARE_ORIGIN_ID: u8 = 1;

// ---------------------------------------------------------------------------
// Derivation Contexts
// ---------------------------------------------------------------------------

/// BLAKE3 `derive_key` context for the ownership key-wrapping KDF.
pub const KEY_WRAP_CONTEXT: &str = "sigil v1 ownership key wrap";

/// BLAKE3 `derive_key` context for per-index chain keys.
pub const CHAIN_KEY_CONTEXT: &str = "sigil v1 chain key";

/// BLAKE3 `derive_key` context for keychain service seeds.
pub const SERVICE_SEED_CONTEXT: &str = "sigil v1 keychain service";

/// Derivation path template for keychain services. `{service}` is replaced
/// by the service name.
pub const SERVICE_DERIVATION_PATH: &str = "m/650'/{service}/0";

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// URL the `local` endpoint alias resolves to.
pub const LOCAL_ENDPOINT_URL: &str = "http://127.0.0.1:4000";

/// URL the `testnet` endpoint alias resolves to.
pub const TESTNET_ENDPOINT_URL: &str = "https://testnet.archethic.net";

/// URL the `mainnet` endpoint alias resolves to.
pub const MAINNET_ENDPOINT_URL: &str = "https://mainnet.archethic.net";

/// Request timeout for ledger API calls, in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;
