//! Ledger transaction record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::types::{Amount, TransactionId};

/// What a ledger entry represents.
///
/// Closed set: balance and statement logic match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money paid into the account.
    Deposit,
    /// Money taken out of the account.
    Withdrawal,
    /// A fee charged by the bank.
    Cost,
    /// Outgoing leg of a transfer.
    TransferOut,
    /// Incoming leg of a transfer.
    TransferIn,
}

impl TransactionKind {
    /// Returns true if entries of this kind increase the balance.
    #[must_use]
    pub const fn is_credit(self) -> bool {
        match self {
            Self::Deposit | Self::TransferIn => true,
            Self::Withdrawal | Self::Cost | Self::TransferOut => false,
        }
    }

    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Cost => "cost",
            Self::TransferOut => "transfer_out",
            Self::TransferIn => "transfer_in",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable monetary event on one account.
///
/// `amount` is always the unsigned magnitude; the kind decides the sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Kind of event.
    pub kind: TransactionKind,
    /// Magnitude of the event.
    pub amount: Amount,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
}

impl Transaction {
    /// Creates a new transaction with a fresh id.
    #[must_use]
    pub fn new(
        kind: TransactionKind,
        amount: Amount,
        timestamp: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            kind,
            amount,
            timestamp,
            description: description.into(),
        }
    }

    /// Returns the effect of this transaction on the balance.
    #[must_use]
    pub fn signed_amount(&self) -> Amount {
        if self.kind.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }
}
