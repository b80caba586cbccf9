//! Property-based tests for the ledger balance.
//!
//! The cached balance must always equal both the left fold over the
//! entries and the per-kind sum formula.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::Amount;

use super::journal::Ledger;
use super::transaction::{Transaction, TransactionKind};

/// Strategy for non-negative amounts (0.00 to 10,000.00).
fn amount_strategy() -> impl Strategy<Value = Amount> {
    (0i64..1_000_000i64).prop_map(|cents| Amount::from_decimal(Decimal::new(cents, 2)))
}

fn kind_strategy() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![
        Just(TransactionKind::Deposit),
        Just(TransactionKind::Withdrawal),
        Just(TransactionKind::Cost),
        Just(TransactionKind::TransferOut),
        Just(TransactionKind::TransferIn),
    ]
}

fn entries_strategy() -> impl Strategy<Value = Vec<(TransactionKind, Amount)>> {
    prop::collection::vec((kind_strategy(), amount_strategy()), 0..50)
}

fn sum_of(entries: &[(TransactionKind, Amount)], kind: TransactionKind) -> Amount {
    entries
        .iter()
        .filter(|(k, _)| *k == kind)
        .map(|(_, amount)| *amount)
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Cached balance equals the fold over the entries.
    #[test]
    fn prop_cached_balance_equals_fold(entries in entries_strategy()) {
        let mut ledger = Ledger::new();
        for (kind, amount) in &entries {
            ledger.append(Transaction::new(*kind, *amount, Utc::now(), "prop"));
            prop_assert_eq!(ledger.balance(), ledger.folded_balance());
        }
    }

    /// Balance equals the per-kind formula.
    #[test]
    fn prop_balance_matches_kind_formula(entries in entries_strategy()) {
        let mut ledger = Ledger::new();
        for (kind, amount) in &entries {
            ledger.append(Transaction::new(*kind, *amount, Utc::now(), "prop"));
        }

        let expected = sum_of(&entries, TransactionKind::Deposit)
            + sum_of(&entries, TransactionKind::TransferIn)
            - sum_of(&entries, TransactionKind::Withdrawal)
            - sum_of(&entries, TransactionKind::Cost)
            - sum_of(&entries, TransactionKind::TransferOut);

        prop_assert_eq!(ledger.balance(), expected);
    }

    /// Balance does not depend on the order the signed effects are summed in.
    #[test]
    fn prop_balance_is_order_independent(entries in entries_strategy()) {
        let mut forward = Ledger::new();
        let mut backward = Ledger::new();
        for (kind, amount) in &entries {
            forward.append(Transaction::new(*kind, *amount, Utc::now(), "prop"));
        }
        for (kind, amount) in entries.iter().rev() {
            backward.append(Transaction::new(*kind, *amount, Utc::now(), "prop"));
        }

        prop_assert_eq!(forward.balance(), backward.balance());
        prop_assert_eq!(forward.len(), entries.len());
    }
}
