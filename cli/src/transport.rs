//! Transport configuration, resolved once per invocation.

use sigil_protocol::crypto::keys::Curve;
use sigil_protocol::network::{ClientError, Endpoint};
use sigil_protocol::pipeline::PrepareOptions;
use sigil_protocol::transaction::{TransactionType, TransportSelectors};

/// Where to send the transaction and how to build it.
///
/// Each field is the flag value if given, else the file value, else the
/// default (`local`, `ED25519`, `transfer`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub endpoint: Endpoint,
    pub curve: Curve,
    pub tx_type: TransactionType,
}

impl TransportConfig {
    pub fn resolve(
        flags: &TransportSelectors,
        file: &TransportSelectors,
    ) -> Result<Self, ClientError> {
        let endpoint = match flags.endpoint.as_deref().or(file.endpoint.as_deref()) {
            Some(endpoint) => endpoint.parse()?,
            None => Endpoint::local(),
        };

        Ok(Self {
            endpoint,
            curve: flags
                .elliptic_curve
                .or(file.elliptic_curve)
                .unwrap_or_default(),
            tx_type: flags
                .transaction_type
                .or(file.transaction_type)
                .unwrap_or_default(),
        })
    }

    pub fn prepare_options(&self) -> PrepareOptions {
        PrepareOptions {
            tx_type: self.tx_type,
            curve: self.curve,
        }
    }
}
