//! End-to-end tests for transaction preparation.
//!
//! These drive the whole path a CLI invocation takes: a YAML request file
//! merged with flag values, assembly with encrypted ownerships, index
//! resolution against a ledger, signing, and submission. The ledger is an
//! in-memory stand-in that records what it was asked.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};

use sigil_protocol::crypto::keys::{ChainKeypair, Curve};
use sigil_protocol::crypto::HashAlgorithm;
use sigil_protocol::identity::{derive_address, derive_keypair, AccessSeed};
use sigil_protocol::network::{ClientError, LedgerClient, SubmissionReceipt, TransactionFee};
use sigil_protocol::pipeline::{prepare, PipelineError, PrepareOptions};
use sigil_protocol::transaction::{
    file, merge, verify_signature, AssemblyError, OwnershipSpec, Recipient, Transaction,
    TransactionRequest, TransactionType, UcoTransferSpec,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// A ledger that knows the length of one chain and keeps what it receives.
#[derive(Default)]
struct MemoryLedger {
    chain_length: u32,
    lookups: Mutex<Vec<String>>,
    submitted: Mutex<Vec<Transaction>>,
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn last_transaction_index(&self, address_hex: &str) -> Result<u32, ClientError> {
        self.lookups.lock().unwrap().push(address_hex.to_string());
        Ok(self.chain_length)
    }

    async fn transaction_fee(&self, tx: &Transaction) -> Result<TransactionFee, ClientError> {
        let transfers = tx.data.ledger.uco.transfers.len() as u64;
        Ok(TransactionFee {
            fee: 1_000 + 500 * transfers,
            rates: [("usd".to_string(), 0.5)].into_iter().collect(),
        })
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<SubmissionReceipt, ClientError> {
        self.submitted.lock().unwrap().push(tx.clone());
        Ok(SubmissionReceipt {
            status: "pending".into(),
            transaction_address: hex::encode(&tx.address),
        })
    }
}

fn x25519_reader() -> (StaticSecret, String) {
    let secret = StaticSecret::random_from_rng(OsRng);
    let public = hex::encode(PublicKey::from(&secret).as_bytes());
    (secret, public)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn documented_example_assembles_as_expected() {
    let (k1_secret, k1) = x25519_reader();
    let (k2_secret, k2) = x25519_reader();

    let request = TransactionRequest {
        access_seed: AccessSeed::new(vec![7u8; 32]),
        uco_transfers: vec![UcoTransferSpec {
            to: "AA".into(),
            amount: 1.5,
        }],
        ownerships: vec![
            OwnershipSpec {
                secret: b"s1".to_vec(),
                authorized_keys: vec![k1.clone()],
            },
            OwnershipSpec {
                secret: b"s1".to_vec(),
                authorized_keys: vec![k2.clone()],
            },
        ],
        ..Default::default()
    };

    let ledger = MemoryLedger::default();
    let prepared = prepare(&request, PrepareOptions::default(), &ledger)
        .await
        .unwrap();
    let tx = &prepared.transaction;

    assert_eq!(tx.data.ledger.uco.transfers.len(), 1);
    assert_eq!(tx.data.ledger.uco.transfers[0].to, vec![0xAA]);
    assert_eq!(tx.data.ledger.uco.transfers[0].amount, 150_000_000);

    assert_eq!(tx.data.ownerships.len(), 1);
    let ownership = &tx.data.ownerships[0];
    assert_eq!(ownership.authorized_keys.len(), 2);

    let raw1 = hex::decode(&k1).unwrap();
    let raw2 = hex::decode(&k2).unwrap();
    let session1 = ownership.session_key(&raw1, &k1_secret).unwrap();
    let session2 = ownership.session_key(&raw2, &k2_secret).unwrap();
    assert_eq!(session1.as_bytes(), session2.as_bytes());
    assert_eq!(ownership.open(&raw1, &k1_secret).unwrap(), b"s1");
    assert_eq!(ownership.open(&raw2, &k2_secret).unwrap(), b"s1");
}

#[tokio::test]
async fn file_and_flags_merge_into_a_signed_submission() {
    let mut yaml = tempfile::NamedTempFile::new().unwrap();
    write!(
        yaml,
        r#"
access_seed: "file seed"
transaction_type: transfer
uco_transfers:
  - to: "00aa"
    amount: 2
recipients:
  - address: "00cc"
    action: vote
    args: ["yes"]
content: "from file"
"#
    )
    .unwrap();

    let loaded = file::load(yaml.path()).unwrap();
    let flags = TransactionRequest {
        uco_transfers: vec![UcoTransferSpec {
            to: "00bb".into(),
            amount: 0.25,
        }],
        ..Default::default()
    };
    let request = merge(loaded.request, flags);

    assert_eq!(request.access_seed.as_bytes(), b"file seed");
    assert_eq!(request.uco_transfers.len(), 1);
    assert_eq!(request.uco_transfers[0].to, "00bb");

    let ledger = MemoryLedger {
        chain_length: 3,
        ..Default::default()
    };
    let options = PrepareOptions {
        tx_type: loaded.transport.transaction_type.unwrap_or_default(),
        curve: Curve::Ed25519,
    };
    let prepared = prepare(&request, options, &ledger).await.unwrap();
    assert_eq!(prepared.index, 3);

    let genesis = derive_address(b"file seed", 0, Curve::Ed25519, HashAlgorithm::Sha256).unwrap();
    assert_eq!(*ledger.lookups.lock().unwrap(), vec![hex::encode(genesis)]);

    let signed = prepared.sign().unwrap();
    assert!(verify_signature(&signed));
    assert_eq!(
        signed.address,
        derive_address(b"file seed", 4, Curve::Ed25519, HashAlgorithm::Sha256).unwrap()
    );
    assert!(matches!(
        &signed.data.recipients[0],
        Recipient::NamedAction { action, .. } if action == "vote"
    ));
    assert_eq!(signed.data.content, b"from file");

    let fee = ledger.transaction_fee(&signed).await.unwrap();
    assert_eq!(fee.fee, 1_500);

    let receipt = ledger.send_transaction(&signed).await.unwrap();
    assert_eq!(receipt.transaction_address, hex::encode(&signed.address));
    assert_eq!(ledger.submitted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn explicit_index_zero_skips_lookup() {
    let request = TransactionRequest {
        access_seed: AccessSeed::new(b"seed".to_vec()),
        index: 0,
        index_supplied: true,
        ..Default::default()
    };
    let ledger = MemoryLedger {
        chain_length: 12,
        ..Default::default()
    };
    let prepared = prepare(&request, PrepareOptions::default(), &ledger)
        .await
        .unwrap();
    assert_eq!(prepared.index, 0);
    assert!(ledger.lookups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn file_index_yields_to_ledger_lookup() {
    let loaded = file::parse("access_seed: \"00ff\"\nindex: 5\n").unwrap();
    let request = merge(loaded.request, TransactionRequest::default());
    assert_eq!(request.index, 5);

    let ledger = MemoryLedger {
        chain_length: 9,
        ..Default::default()
    };
    let prepared = prepare(&request, PrepareOptions::default(), &ledger)
        .await
        .unwrap();

    assert_eq!(prepared.index, 9);
    assert_eq!(ledger.lookups.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_hex_aborts_before_lookup() {
    let request = TransactionRequest {
        access_seed: AccessSeed::new(b"seed".to_vec()),
        uco_transfers: vec![UcoTransferSpec {
            to: "not hex".into(),
            amount: 1.0,
        }],
        ..Default::default()
    };
    let ledger = MemoryLedger::default();
    let err = prepare(&request, PrepareOptions::default(), &ledger)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Assembly(AssemblyError::InvalidHex { .. })
    ));
    assert!(err.to_string().contains("not hex"));
    assert!(ledger.lookups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn chain_identity_can_read_its_own_ownership() {
    let seed = b"owner seed";
    let identity: ChainKeypair = derive_keypair(seed, 0, Curve::Ed25519).unwrap();
    let tagged = hex::encode(identity.tagged_public_key());

    let request = TransactionRequest {
        access_seed: AccessSeed::new(seed.to_vec()),
        index_supplied: true,
        ownerships: vec![OwnershipSpec {
            secret: b"wallet backup".to_vec(),
            authorized_keys: vec![tagged.clone()],
        }],
        ..Default::default()
    };
    let options = PrepareOptions {
        tx_type: TransactionType::Keychain,
        curve: Curve::Ed25519,
    };
    let signed = prepare(&request, options, &MemoryLedger::default())
        .await
        .unwrap()
        .sign()
        .unwrap();

    let raw = hex::decode(&tagged).unwrap();
    let opened = signed.data.ownerships[0]
        .open(&raw, &identity.x25519_secret())
        .unwrap();
    assert_eq!(opened, b"wallet backup");
    assert_eq!(signed.tx_type, TransactionType::Keychain);
}
