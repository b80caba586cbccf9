//! Running-balance statement construction.
//!
//! Lines are produced oldest first, each stamped with the balance after
//! its transaction, then reversed so the statement reads most recent
//! first with the previous-balance line at the bottom.

use tally_shared::types::Amount;

use super::types::{Statement, StatementLine};
use crate::ledger::Transaction;

/// Balance before and after one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunningBalance {
    previous: Amount,
    current: Amount,
}

impl RunningBalance {
    fn opening(balance: Amount) -> Self {
        Self {
            previous: balance,
            current: balance,
        }
    }

    /// `current[N] = current[N-1] + change`, `previous[N] = current[N-1]`.
    fn next(self, change: Amount) -> Self {
        Self {
            previous: self.current,
            current: self.current + change,
        }
    }
}

/// Folds transactions into statement lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementBuilder;

impl StatementBuilder {
    /// Creates a builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds a statement listing every transaction of a chronological
    /// history.
    pub fn build<'a, I>(&self, transactions: I) -> Statement
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        self.build_selected(transactions, |_| true)
    }

    /// Builds a statement from a full chronological history, listing only
    /// the transactions `include` accepts.
    ///
    /// The running balance folds over the whole history, so every line
    /// carries the real balance after its transaction. The previous-balance
    /// line carries the balance before the first listed transaction.
    pub fn build_selected<'a, I, F>(&self, transactions: I, mut include: F) -> Statement
    where
        I: IntoIterator<Item = &'a Transaction>,
        F: FnMut(&Transaction) -> bool,
    {
        let mut running = RunningBalance::opening(Amount::ZERO);
        let mut previous_balance = None;
        let mut lines = Vec::new();

        for transaction in transactions {
            let change = transaction.signed_amount();
            running = running.next(change);
            debug_assert_eq!(running.current, running.previous + change);
            if !include(transaction) {
                continue;
            }
            previous_balance.get_or_insert(running.previous);
            lines.push(StatementLine {
                transaction_id: Some(transaction.id),
                timestamp: Some(transaction.timestamp),
                description: transaction.description.clone(),
                amount: change,
                balance: running.current,
            });
        }

        lines.reverse();
        lines.push(StatementLine::previous_balance(
            previous_balance.unwrap_or(running.current),
        ));
        Statement::from_lines(lines)
    }
}
