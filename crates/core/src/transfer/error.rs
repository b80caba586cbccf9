//! Transfer error types.

use tally_shared::AppError;
use tally_shared::types::{AccountId, Amount, TransferId};
use thiserror::Error;

use crate::account::AccountError;

/// Errors that can occur while driving a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// No transfer is known under this id (outgoing or incoming).
    #[error("Transfer {0} not found")]
    TransferNotFound(TransferId),

    /// The request references an account the bank does not hold.
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    /// Sender and receiver are the same account.
    #[error("Cannot transfer from account {0} to itself")]
    SameAccount(AccountId),

    /// Transfer amounts must be strictly positive.
    #[error("Invalid transfer amount: {0}")]
    InvalidAmount(Amount),

    /// The presented PIN does not validate.
    #[error("PIN mismatch: {remaining_attempts} attempt(s) remaining")]
    PinMismatch {
        /// Attempts left before the transfer is rejected.
        remaining_attempts: u32,
    },

    /// An account refused to register or commit its leg.
    #[error(transparent)]
    Account(#[from] AccountError),
}

impl TransferError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::TransferNotFound(_) | Self::AccountNotFound(_) => 404,
            Self::SameAccount(_) | Self::InvalidAmount(_) => 400,
            Self::PinMismatch { .. } => 403,
            Self::Account(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::TransferNotFound(_) => "TRANSFER_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::SameAccount(_) => "SAME_ACCOUNT",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::PinMismatch { .. } => "PIN_MISMATCH",
            Self::Account(err) => err.error_code(),
        }
    }
}

impl From<TransferError> for AppError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Account(inner) => inner.into(),
            TransferError::TransferNotFound(_) | TransferError::AccountNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            TransferError::SameAccount(_) | TransferError::InvalidAmount(_) => {
                Self::Validation(err.to_string())
            }
            TransferError::PinMismatch { .. } => Self::BusinessRule(err.to_string()),
        }
    }
}
