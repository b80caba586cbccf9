//! Transaction selection for statements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::{Transaction, TransactionKind};

/// Decides which transactions appear on a statement.
///
/// Implemented for every `Fn(&Transaction) -> bool` and for
/// [`TransactionFilter`].
pub trait TransactionPredicate {
    /// Returns true if `transaction` belongs on the statement.
    fn accepts(&self, transaction: &Transaction) -> bool;
}

impl<F> TransactionPredicate for F
where
    F: Fn(&Transaction) -> bool,
{
    fn accepts(&self, transaction: &Transaction) -> bool {
        self(transaction)
    }
}

/// Predicate accepting every transaction.
#[must_use]
pub fn all() -> impl Fn(&Transaction) -> bool + Copy {
    |_: &Transaction| true
}

/// Declarative filter by kind and time window.
///
/// An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Only these kinds (all kinds when empty).
    pub kinds: Vec<TransactionKind>,
    /// Only transactions at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Only transactions strictly before this instant.
    pub until: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a kind to the filter.
    #[must_use]
    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kinds.push(kind);
        self
    }

    /// Restricts the filter to `[from, until)`.
    #[must_use]
    pub const fn between(mut self, from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.until = Some(until);
        self
    }

    /// Returns true if the filter is empty (matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty() && self.from.is_none() && self.until.is_none()
    }
}

impl TransactionPredicate for TransactionFilter {
    fn accepts(&self, transaction: &Transaction) -> bool {
        let kind_matches = self.kinds.is_empty() || self.kinds.contains(&transaction.kind);
        let after_start = self.from.is_none_or(|from| transaction.timestamp >= from);
        let before_end = self.until.is_none_or(|until| transaction.timestamp < until);
        kind_matches && after_start && before_end
    }
}
