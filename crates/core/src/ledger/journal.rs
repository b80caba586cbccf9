//! Append-only transaction ledger.
//!
//! The running balance is maintained on every append and always equals
//! the fold over the entries:
//!
//! `balance = Σ deposits + Σ transfers in − Σ withdrawals − Σ costs − Σ transfers out`

use tally_shared::types::{Amount, TransactionId};

use super::transaction::Transaction;

/// Ordered, append-only sequence of transactions owned by one account.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<Transaction>,
    balance: Amount,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transaction and returns its id.
    pub(crate) fn append(&mut self, transaction: Transaction) -> TransactionId {
        let id = transaction.id;
        self.balance = self.balance + transaction.signed_amount();
        self.entries.push(transaction);
        id
    }

    /// Returns the current balance (cached).
    #[must_use]
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Recomputes the balance by folding over every entry in insertion order.
    #[must_use]
    pub fn folded_balance(&self) -> Amount {
        self.entries
            .iter()
            .fold(Amount::ZERO, |acc, tx| acc + tx.signed_amount())
    }

    /// Looks up a transaction by id.
    #[must_use]
    pub fn find(&self, id: TransactionId) -> Option<&Transaction> {
        self.entries.iter().find(|tx| tx.id == id)
    }

    /// Returns all entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was ever posted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
