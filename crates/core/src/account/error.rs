//! Account error types.

use tally_shared::AppError;
use tally_shared::types::{Amount, TransferId};
use thiserror::Error;

/// Errors that can occur during account operations.
///
/// Every failing operation leaves the ledger and the pending-transfer
/// registry untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Amount is negative (or not positive where a positive one is required).
    #[error("Invalid amount: {0}")]
    InvalidAmount(Amount),

    /// Debit would overdraw an account that does not allow overdraft.
    #[error("Overdraft denied: requested {requested}, available {available}")]
    OverdraftDenied {
        /// The amount that was requested.
        requested: Amount,
        /// The balance at the time of the request.
        available: Amount,
    },

    /// No pending transfer with this id is registered on the account.
    #[error("Transfer {0} not found")]
    TransferNotFound(TransferId),

    /// A pending transfer with this id is already registered.
    #[error("Transfer {0} is already registered")]
    DuplicateTransfer(TransferId),
}

impl AccountError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount(_) => 400,
            Self::OverdraftDenied { .. } => 422,
            Self::TransferNotFound(_) => 404,
            Self::DuplicateTransfer(_) => 409,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::OverdraftDenied { .. } => "OVERDRAFT_DENIED",
            Self::TransferNotFound(_) => "TRANSFER_NOT_FOUND",
            Self::DuplicateTransfer(_) => "DUPLICATE_TRANSFER",
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        let message = err.to_string();
        match err {
            AccountError::InvalidAmount(_) => Self::Validation(message),
            AccountError::OverdraftDenied { .. } => Self::BusinessRule(message),
            AccountError::TransferNotFound(_) => Self::NotFound(message),
            AccountError::DuplicateTransfer(_) => Self::Conflict(message),
        }
    }
}
