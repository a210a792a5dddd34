//! Turning command-line flags into a [`TransactionRequest`].
//!
//! The `parse_*` functions are clap value parsers for the repeatable flags.
//! They only check syntax; hex validity and amount ranges are checked when
//! the request is assembled.

use std::fs;

use anyhow::{Context, Result};
use serde_json::Value;

use sigil_protocol::identity::{resolve_seed, AccessSeed, SeedSource};
use sigil_protocol::transaction::{
    OwnershipSpec, RecipientSpec, TokenTransferSpec, TransactionRequest, TransportSelectors,
    UcoTransferSpec,
};

use crate::cli::TransactionArgs;

/// `--uco-transfer <to>=<amount>`
pub fn parse_uco_transfer(value: &str) -> Result<UcoTransferSpec, String> {
    let malformed = || format!("invalid --uco-transfer '{value}': expected <to>=<amount>");

    let (to, amount) = value.split_once('=').ok_or_else(malformed)?;
    let amount = amount.trim().parse::<f64>().map_err(|_| malformed())?;
    Ok(UcoTransferSpec {
        to: to.trim().to_string(),
        amount,
    })
}

/// `--token-transfer <to>=<amount>,<token_address>,<token_id>`
pub fn parse_token_transfer(value: &str) -> Result<TokenTransferSpec, String> {
    let malformed = || {
        format!(
            "invalid --token-transfer '{value}': expected <to>=<amount>,<token_address>,<token_id>"
        )
    };

    let (to, rest) = value.split_once('=').ok_or_else(malformed)?;
    let mut parts = rest.split(',');
    let (Some(amount), Some(token_address), Some(token_id), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    Ok(TokenTransferSpec {
        to: to.trim().to_string(),
        amount: amount.trim().parse().map_err(|_| malformed())?,
        token_address: token_address.trim().to_string(),
        token_id: token_id.trim().parse().map_err(|_| malformed())?,
    })
}

/// `--recipient <address>` or `--recipient <address>={"action":"..","args":[..]}`
pub fn parse_recipient(value: &str) -> Result<RecipientSpec, String> {
    let (address, json) = value.split_once('=').unwrap_or((value, ""));
    if json.trim().is_empty() {
        return Ok(RecipientSpec::plain(address.trim()));
    }

    let parsed: Value = serde_json::from_str(json)
        .map_err(|e| format!("invalid --recipient '{value}': {e}"))?;

    let action = match parsed.get("action") {
        Some(Value::String(action)) => action.clone(),
        _ => {
            return Err(format!(
                "invalid --recipient '{value}': \"action\" must be a string"
            ))
        }
    };

    let args_json = match parsed.get("args") {
        None | Some(Value::Null) => "[]".to_string(),
        Some(args @ Value::Array(_)) => args.to_string(),
        Some(_) => {
            return Err(format!(
                "invalid --recipient '{value}': \"args\" must be an array"
            ))
        }
    };

    Ok(RecipientSpec {
        address: address.trim().to_string(),
        action,
        args_json,
    })
}

/// `--ownership <secret>=<authorized_key>`
///
/// Splits on the last `=` so the secret itself may contain one.
pub fn parse_ownership(value: &str) -> Result<OwnershipSpec, String> {
    let (secret, key) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("invalid --ownership '{value}': expected <secret>=<authorized_key>"))?;

    Ok(OwnershipSpec {
        secret: secret.as_bytes().to_vec(),
        authorized_keys: vec![key.trim().to_string()],
    })
}

/// The request described by the flags alone. Unset flags stay empty so the
/// file can fill them in.
pub fn build_request(args: &TransactionArgs) -> Result<TransactionRequest> {
    let access_seed = match (&args.access_seed, &args.mnemonic) {
        (Some(seed), _) => {
            resolve_seed(SeedSource::AccessSeed(seed)).context("invalid --access-seed")?
        }
        (None, Some(phrase)) => {
            resolve_seed(SeedSource::Mnemonic(phrase)).context("invalid --mnemonic")?
        }
        (None, None) => AccessSeed::empty(),
    };

    let content = match &args.content {
        Some(path) => fs::read(path)
            .with_context(|| format!("failed to read content file {}", path.display()))?,
        None => Vec::new(),
    };

    let smart_contract = match &args.smart_contract {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read smart contract {}", path.display()))?,
        None => String::new(),
    };

    Ok(TransactionRequest {
        access_seed,
        index: args.index.unwrap_or_default(),
        index_supplied: args.index.is_some(),
        uco_transfers: args.uco_transfers.clone(),
        token_transfers: args.token_transfers.clone(),
        recipients: args.recipients.clone(),
        ownerships: args.ownerships.clone(),
        content,
        smart_contract,
        service_name: args.service_name.clone().unwrap_or_default(),
    })
}

/// Transport selectors given on the command line.
pub fn transport_selectors(args: &TransactionArgs) -> TransportSelectors {
    TransportSelectors {
        endpoint: args.endpoint.clone().filter(|e| !e.trim().is_empty()),
        elliptic_curve: args.elliptic_curve,
        transaction_type: args.transaction_type,
    }
}
