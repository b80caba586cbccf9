//! Transfer domain types.
//!
//! A transfer runs through these states:
//! - Initial → WaitingForOutgoingConfirmation (sender has outgoing security)
//! - Initial → IncomingRequest (otherwise)
//! - WaitingForOutgoingConfirmation → IncomingRequest (PIN accepted)
//! - IncomingRequest → WaitingForIncomingConfirmation (receiver has incoming security)
//! - IncomingRequest → PerformingActions (otherwise)
//! - WaitingForIncomingConfirmation → PerformingActions (PIN accepted)
//! - PerformingActions → Confirmed
//! - any non-terminal state → Rejected

use serde::{Deserialize, Serialize};
use std::fmt;
use tally_shared::types::{AccountId, Amount, TransferId};

use crate::security::PinCode;

/// A request to move money between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Account the money leaves.
    pub from: AccountId,
    /// Account the money enters.
    pub to: AccountId,
    /// Amount to move.
    pub amount: Amount,
    /// Description posted on both ledgers.
    pub description: String,
}

impl TransferRequest {
    /// Creates a new transfer request.
    #[must_use]
    pub fn new(
        from: AccountId,
        to: AccountId,
        amount: Amount,
        description: impl Into<String>,
    ) -> Self {
        Self {
            from,
            to,
            amount,
            description: description.into(),
        }
    }
}

/// Which side of a transfer a leg belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    /// The sender's leg.
    Outgoing,
    /// The receiver's leg.
    Incoming,
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outgoing => f.write_str("outgoing"),
            Self::Incoming => f.write_str("incoming"),
        }
    }
}

/// What must be presented to confirm one leg of a transfer.
#[derive(Debug, Clone)]
pub enum TransferPayload {
    /// Confirmation requires the PIN generated for this leg.
    Secure {
        /// Id of the leg.
        transfer_id: TransferId,
        /// Expected PIN.
        code: PinCode,
        /// The transfer being confirmed.
        request: TransferRequest,
    },
    /// Confirmation is implicit.
    NotSecure {
        /// Id of the leg.
        transfer_id: TransferId,
        /// The transfer being confirmed.
        request: TransferRequest,
    },
}

impl TransferPayload {
    /// Returns the id of the leg.
    #[must_use]
    pub fn transfer_id(&self) -> TransferId {
        match self {
            Self::Secure { transfer_id, .. } | Self::NotSecure { transfer_id, .. } => *transfer_id,
        }
    }

    /// Returns the request the payload confirms.
    #[must_use]
    pub fn request(&self) -> &TransferRequest {
        match self {
            Self::Secure { request, .. } | Self::NotSecure { request, .. } => request,
        }
    }

    /// Returns true if a PIN is required.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        matches!(self, Self::Secure { .. })
    }

    /// Returns true if `presented` confirms this leg.
    #[must_use]
    pub fn validate(&self, presented: &PinCode) -> bool {
        match self {
            Self::Secure { code, .. } => code.validated_by(presented),
            Self::NotSecure { .. } => true,
        }
    }
}

/// Why a transfer was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Too many wrong PINs on one leg.
    PinAttemptsExhausted,
    /// The sender could not cover the amount at commit time.
    InsufficientFunds,
    /// A leg stayed unconfirmed past the configured TTL.
    Expired,
    /// An account could not register or commit its leg.
    Aborted,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::PinAttemptsExhausted => "pin attempts exhausted",
            Self::InsufficientFunds => "insufficient funds",
            Self::Expired => "expired",
            Self::Aborted => "aborted",
        };
        f.write_str(reason)
    }
}

/// Protocol state of one transfer.
///
/// Waiting states own the payload of the leg they wait on.
#[derive(Debug, Clone)]
pub enum TransferState {
    /// Nothing registered yet.
    Initial,
    /// Sender's PIN required.
    WaitingForOutgoingConfirmation {
        /// Sender-side payload.
        payload: TransferPayload,
        /// Wrong PINs presented so far.
        failed_attempts: u32,
    },
    /// Sender leg accepted; receiver leg not opened yet.
    IncomingRequest,
    /// Receiver's PIN required.
    WaitingForIncomingConfirmation {
        /// Receiver-side payload.
        payload: TransferPayload,
        /// Wrong PINs presented so far.
        failed_attempts: u32,
    },
    /// Both legs accepted; ledgers about to be posted.
    PerformingActions,
    /// Both ledgers posted.
    Confirmed,
    /// Abandoned without touching any ledger.
    Rejected {
        /// Why the transfer was abandoned.
        reason: RejectionReason,
    },
}

/// Payload-free view of a [`TransferState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum TransferStatus {
    /// See [`TransferState::Initial`].
    Initial,
    /// See [`TransferState::WaitingForOutgoingConfirmation`].
    WaitingForOutgoingConfirmation,
    /// See [`TransferState::IncomingRequest`].
    IncomingRequest,
    /// See [`TransferState::WaitingForIncomingConfirmation`].
    WaitingForIncomingConfirmation,
    /// See [`TransferState::PerformingActions`].
    PerformingActions,
    /// See [`TransferState::Confirmed`].
    Confirmed,
    /// See [`TransferState::Rejected`].
    Rejected(RejectionReason),
}

impl TransferStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::WaitingForOutgoingConfirmation => "waiting_for_outgoing_confirmation",
            Self::IncomingRequest => "incoming_request",
            Self::WaitingForIncomingConfirmation => "waiting_for_incoming_confirmation",
            Self::PerformingActions => "performing_actions",
            Self::Confirmed => "confirmed",
            Self::Rejected(_) => "rejected",
        }
    }

    /// Returns true if no further transition can happen.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Rejected(_))
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "rejected ({reason})"),
            other => f.write_str(other.as_str()),
        }
    }
}
