//! Statement read model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::types::{Amount, TransactionId};

/// Description of the opening line of every statement.
pub const PREVIOUS_BALANCE_DESCRIPTION: &str = "Previous balance";

/// One row of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Transaction behind the line; `None` for the previous-balance line.
    pub transaction_id: Option<TransactionId>,
    /// When the transaction happened; `None` for the previous-balance line.
    pub timestamp: Option<DateTime<Utc>>,
    /// Transaction description.
    pub description: String,
    /// Signed effect on the balance.
    pub amount: Amount,
    /// Balance after this line.
    pub balance: Amount,
}

impl StatementLine {
    /// Creates the opening line carrying `balance`.
    #[must_use]
    pub fn previous_balance(balance: Amount) -> Self {
        Self {
            transaction_id: None,
            timestamp: None,
            description: PREVIOUS_BALANCE_DESCRIPTION.to_string(),
            amount: Amount::ZERO,
            balance,
        }
    }

    /// Returns true for the opening line.
    #[must_use]
    pub fn is_previous_balance(&self) -> bool {
        self.transaction_id.is_none()
    }
}

/// Lines of a statement, most recent first.
///
/// The previous-balance line is always last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    lines: Vec<StatementLine>,
}

impl Statement {
    pub(crate) fn from_lines(lines: Vec<StatementLine>) -> Self {
        Self { lines }
    }

    /// Returns the lines, most recent first.
    #[must_use]
    pub fn lines(&self) -> &[StatementLine] {
        &self.lines
    }

    /// Number of lines, the previous-balance line included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false: a statement has at least its previous-balance line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Balance after the most recent line.
    #[must_use]
    pub fn closing_balance(&self) -> Amount {
        self.lines.first().map_or(Amount::ZERO, |line| line.balance)
    }

    /// Balance column, top to bottom.
    #[must_use]
    pub fn balances(&self) -> Vec<Amount> {
        self.lines.iter().map(|line| line.balance).collect()
    }
}

impl<'a> IntoIterator for &'a Statement {
    type Item = &'a StatementLine;
    type IntoIter = std::slice::Iter<'a, StatementLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
