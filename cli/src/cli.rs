//! # CLI Interface
//!
//! Defines the command-line argument structure for `sigil` using `clap`
//! derive. Two subcommands share one set of request flags:
//! `send-transaction` and `get-transaction-fee`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use sigil_protocol::crypto::keys::Curve;
use sigil_protocol::transaction::{
    OwnershipSpec, RecipientSpec, TokenTransferSpec, TransactionType, UcoTransferSpec,
};

use crate::flags::{parse_ownership, parse_recipient, parse_token_transfer, parse_uco_transfer};
use crate::logging::LogFormat;

/// Assemble, sign and submit ledger transactions.
///
/// Requests come from a YAML file (`--config`), from flags, or both; flag
/// values take precedence over file values field by field.
#[derive(Parser, Debug)]
#[command(
    name = "sigil",
    about = "Assemble, sign and submit ledger transactions",
    version,
    propagate_version = true
)]
pub struct SigilCli {
    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Default log filter directive. `RUST_LOG` wins when set.
    #[arg(
        long,
        global = true,
        env = "SIGIL_LOG",
        default_value = "sigil=info,sigil_protocol=info"
    )]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign the transaction and submit it; prints the receipt as JSON.
    SendTransaction(TransactionArgs),
    /// Sign the transaction and ask the ledger for its fee; prints
    /// `{fee, rates}` as JSON.
    GetTransactionFee(TransactionArgs),
}

/// Request and transport flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct TransactionArgs {
    /// YAML request file. Flags override its values.
    #[arg(long, short = 'c', env = "SIGIL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ledger endpoint: `local`, `testnet`, `mainnet` or an http(s):// URL.
    #[arg(long, env = "SIGIL_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Elliptic curve of the signing identity (ED25519, P256, SECP256K1).
    #[arg(long)]
    pub elliptic_curve: Option<Curve>,

    /// Transaction type, e.g. `transfer`, `data`, `contract`.
    #[arg(long)]
    pub transaction_type: Option<TransactionType>,

    /// Access seed, hex or raw text.
    #[arg(long, env = "SIGIL_ACCESS_SEED", conflicts_with = "mnemonic")]
    pub access_seed: Option<String>,

    /// BIP-39 English phrase to derive the access seed from.
    #[arg(long)]
    pub mnemonic: Option<String>,

    /// Chain index to sign at. Looked up on the ledger when omitted.
    #[arg(long)]
    pub index: Option<u32>,

    /// UCO transfer as `<to>=<amount>`. Repeatable.
    #[arg(long = "uco-transfer", value_parser = parse_uco_transfer)]
    pub uco_transfers: Vec<UcoTransferSpec>,

    /// Token transfer as `<to>=<amount>,<token_address>,<token_id>`. Repeatable.
    #[arg(long = "token-transfer", value_parser = parse_token_transfer)]
    pub token_transfers: Vec<TokenTransferSpec>,

    /// Recipient as `<address>` or `<address>={"action":..,"args":[..]}`.
    /// Repeatable.
    #[arg(long = "recipient", value_parser = parse_recipient)]
    pub recipients: Vec<RecipientSpec>,

    /// Ownership as `<secret>=<authorized public key>`. Repeatable; entries
    /// with the same secret share one envelope.
    #[arg(long = "ownership", value_parser = parse_ownership)]
    pub ownerships: Vec<OwnershipSpec>,

    /// File whose bytes become the transaction content.
    #[arg(long)]
    pub content: Option<PathBuf>,

    /// File whose text becomes the transaction code.
    #[arg(long)]
    pub smart_contract: Option<PathBuf>,

    /// Build on behalf of this keychain service.
    #[arg(long)]
    pub service_name: Option<String>,

    /// Review and edit the transaction in a terminal UI before signing.
    #[arg(long, short = 'i')]
    pub interactive: bool,
}
