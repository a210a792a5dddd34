//! Reconciling the file-sourced and flag-sourced requests.
//!
//! Field by field, the flag value wins when it is present: non-empty for
//! sequences, strings and bytes, non-zero for the index. Sequences are
//! replaced whole, never merged element-wise.
//!
//! A flag index of `0` therefore never overrides a file index. This is
//! deliberate: `0` is also what an absent `--index` looks like.
//! Whether the ledger lookup is skipped depends on `index_supplied` alone,
//! which only `--index` sets.

use super::request::TransactionRequest;

/// Merge `file` and `flags` into one request. Never fails; missing
/// mandatory fields are caught downstream.
pub fn merge(file: TransactionRequest, flags: TransactionRequest) -> TransactionRequest {
    TransactionRequest {
        access_seed: if flags.access_seed.is_empty() {
            file.access_seed
        } else {
            flags.access_seed
        },
        index: if flags.index != 0 {
            flags.index
        } else {
            file.index
        },
        index_supplied: file.index_supplied || flags.index_supplied,
        uco_transfers: prefer_non_empty(flags.uco_transfers, file.uco_transfers),
        token_transfers: prefer_non_empty(flags.token_transfers, file.token_transfers),
        recipients: prefer_non_empty(flags.recipients, file.recipients),
        ownerships: prefer_non_empty(flags.ownerships, file.ownerships),
        content: prefer_non_empty(flags.content, file.content),
        smart_contract: if flags.smart_contract.is_empty() {
            file.smart_contract
        } else {
            flags.smart_contract
        },
        service_name: if flags.service_name.is_empty() {
            file.service_name
        } else {
            flags.service_name
        },
    }
}

fn prefer_non_empty<T>(flag: Vec<T>, file: Vec<T>) -> Vec<T> {
    if flag.is_empty() {
        file
    } else {
        flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AccessSeed;
    use crate::transaction::request::{OwnershipSpec, RecipientSpec, UcoTransferSpec};
    use proptest::prelude::*;

    fn file_request() -> TransactionRequest {
        TransactionRequest {
            access_seed: AccessSeed::new(b"file-seed".to_vec()),
            index: 7,
            index_supplied: true,
            uco_transfers: vec![UcoTransferSpec {
                to: "aa".into(),
                amount: 1.0,
            }],
            recipients: vec![RecipientSpec::plain("bb")],
            content: b"file content".to_vec(),
            smart_contract: "file code".into(),
            service_name: "file-service".into(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_flags_keep_file_values() {
        let merged = merge(file_request(), TransactionRequest::default());
        assert_eq!(merged, file_request());
    }

    #[test]
    fn non_empty_flags_win() {
        let flags = TransactionRequest {
            access_seed: AccessSeed::new(b"flag-seed".to_vec()),
            index: 2,
            index_supplied: true,
            uco_transfers: vec![UcoTransferSpec {
                to: "cc".into(),
                amount: 3.0,
            }],
            content: b"flag content".to_vec(),
            service_name: "flag-service".into(),
            ..Default::default()
        };
        let merged = merge(file_request(), flags);
        assert_eq!(merged.access_seed.as_bytes(), b"flag-seed");
        assert_eq!(merged.index, 2);
        assert_eq!(merged.uco_transfers[0].to, "cc");
        assert_eq!(merged.content, b"flag content");
        assert_eq!(merged.service_name, "flag-service");
        // Untouched by flags.
        assert_eq!(merged.recipients, vec![RecipientSpec::plain("bb")]);
        assert_eq!(merged.smart_contract, "file code");
    }

    #[test]
    fn flag_index_zero_does_not_override_file_index() {
        let flags = TransactionRequest {
            index: 0,
            index_supplied: true,
            ..Default::default()
        };
        let merged = merge(file_request(), flags);
        assert_eq!(merged.index, 7);
        assert!(merged.index_supplied);
    }

    #[test]
    fn sequences_are_replaced_not_merged() {
        let file = TransactionRequest {
            ownerships: vec![
                OwnershipSpec {
                    secret: b"a".to_vec(),
                    authorized_keys: vec!["01".into()],
                },
                OwnershipSpec {
                    secret: b"b".to_vec(),
                    authorized_keys: vec!["02".into()],
                },
            ],
            ..Default::default()
        };
        let flags = TransactionRequest {
            ownerships: vec![OwnershipSpec {
                secret: b"c".to_vec(),
                authorized_keys: vec!["03".into()],
            }],
            ..Default::default()
        };
        let merged = merge(file, flags.clone());
        assert_eq!(merged.ownerships, flags.ownerships);
    }

    fn arb_request() -> impl Strategy<Value = TransactionRequest> {
        (
            proptest::collection::vec(any::<u8>(), 0..4),
            0u32..4,
            any::<bool>(),
            proptest::collection::vec(("[0-9a-f]{0,4}", 0.0f64..10.0), 0..3),
            proptest::collection::vec("[0-9a-f]{0,4}", 0..3),
            proptest::collection::vec(any::<u8>(), 0..4),
            "[a-z]{0,3}",
            "[a-z]{0,3}",
        )
            .prop_map(
                |(seed, index, index_supplied, uco, recipients, content, code, service)| {
                    TransactionRequest {
                        access_seed: AccessSeed::new(seed),
                        index,
                        index_supplied,
                        uco_transfers: uco
                            .into_iter()
                            .map(|(to, amount)| UcoTransferSpec { to, amount })
                            .collect(),
                        recipients: recipients.into_iter().map(RecipientSpec::plain).collect(),
                        content,
                        smart_contract: code,
                        service_name: service,
                        ..Default::default()
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(file in arb_request(), flags in arb_request()) {
            let once = merge(file, flags.clone());
            let twice = merge(once.clone(), flags);
            prop_assert_eq!(twice, once);
        }

        #[test]
        fn empty_flag_fields_never_override(file in arb_request()) {
            let merged = merge(file.clone(), TransactionRequest::default());
            prop_assert_eq!(merged, file);
        }
    }
}
