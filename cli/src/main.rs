// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # sigil
//!
//! Entry point for the `sigil` binary. Parses CLI arguments, initializes
//! logging, builds a transaction request from a YAML file and flags, and
//! talks to the ledger.
//!
//! The binary supports two subcommands:
//!
//! - `send-transaction`    : sign and submit, print the receipt
//! - `get-transaction-fee` : sign and estimate, print the fee
//!
//! Both accept `--interactive` to review and edit recipients in a terminal
//! UI before the transaction is signed.

mod cli;
mod flags;
mod logging;
mod transport;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use sigil_protocol::network::{HttpLedgerClient, LedgerClient};
use sigil_protocol::pipeline::prepare;
use sigil_protocol::transaction::{file, merge, RequestFile, Transaction};

use cli::{Commands, SigilCli, TransactionArgs};
use transport::TransportConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = SigilCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::SendTransaction(args) => {
            let Some((client, tx)) = signed_transaction(&args).await? else {
                return Ok(());
            };
            let receipt = client.send_transaction(&tx).await?;
            tracing::info!(
                status = %receipt.status,
                address = %receipt.transaction_address,
                "transaction submitted"
            );
            print_json(&receipt)
        }
        Commands::GetTransactionFee(args) => {
            let Some((client, tx)) = signed_transaction(&args).await? else {
                return Ok(());
            };
            let fee = client.transaction_fee(&tx).await?;
            print_json(&fee)
        }
    }
}

/// Load, merge, prepare, optionally review, and sign.
///
/// Returns `None` when the operator aborts the review.
async fn signed_transaction(
    args: &TransactionArgs,
) -> Result<Option<(HttpLedgerClient, Transaction)>> {
    let request_file = match &args.config {
        Some(path) => file::load(path)
            .with_context(|| format!("failed to load request file {}", path.display()))?,
        None => RequestFile::default(),
    };

    let request = merge(request_file.request, flags::build_request(args)?);
    let transport =
        TransportConfig::resolve(&flags::transport_selectors(args), &request_file.transport)?;
    tracing::info!(
        endpoint = %transport.endpoint,
        curve = %transport.curve,
        tx_type = %transport.tx_type,
        "transport resolved"
    );

    let client = HttpLedgerClient::new(transport.endpoint.clone())?;
    let mut prepared = prepare(&request, transport.prepare_options(), &client).await?;
    tracing::info!(index = prepared.index, "transaction prepared");

    if args.interactive {
        match tui::review(&mut prepared)? {
            tui::Outcome::Confirmed => {}
            tui::Outcome::Aborted => {
                tracing::warn!("review aborted, nothing was sent");
                return Ok(None);
            }
        }
    }

    let tx = prepared.sign()?;
    tracing::debug!(address = %hex::encode(&tx.address), "transaction signed");
    Ok(Some((client, tx)))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{json}");
    Ok(())
}
