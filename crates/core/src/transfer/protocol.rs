//! Transfer confirmation state machine.
//!
//! [`TransferState::transition`] is a pure step function: the only side
//! effects it can cause go through the [`TransferLegs`] it is handed, and
//! only `Initial`, `IncomingRequest` and `PerformingActions` touch them.
//! Waiting states stay put until [`TransferState::confirm`] is called with
//! a PIN; terminal states return themselves forever.

use tracing::debug;

use super::error::TransferError;
use super::types::{
    RejectionReason, TransferDirection, TransferPayload, TransferState, TransferStatus,
};
use crate::security::PinCode;

/// The two accounts a transfer runs between, as seen by the state machine.
pub trait TransferLegs {
    /// Registers the sender leg and returns its payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the sender cannot take the leg.
    fn open_outgoing(&mut self) -> Result<TransferPayload, TransferError>;

    /// Registers the receiver leg and returns its payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the receiver cannot take the leg.
    fn open_incoming(&mut self) -> Result<TransferPayload, TransferError>;

    /// Posts `TransferOut` on the sender and `TransferIn` on the receiver.
    ///
    /// Must either post both entries or neither.
    ///
    /// # Errors
    ///
    /// Returns an error if either leg cannot be committed.
    fn commit(&mut self) -> Result<(), TransferError>;
}

/// Outcome of presenting a PIN to a transfer.
#[derive(Debug, Clone)]
pub enum Confirmation {
    /// The PIN validated; the leg moves on.
    Accepted(TransferState),
    /// The PIN did not validate.
    Mismatch {
        /// State after the failed attempt (`Rejected` once attempts run out).
        state: TransferState,
        /// Attempts left on this leg.
        remaining_attempts: u32,
    },
    /// The transfer was not waiting on this leg; nothing happened.
    Unchanged(TransferState),
}

impl Confirmation {
    /// Returns the state after the confirmation.
    #[must_use]
    pub fn into_state(self) -> TransferState {
        match self {
            Self::Accepted(state) | Self::Unchanged(state) | Self::Mismatch { state, .. } => state,
        }
    }
}

impl TransferState {
    /// Returns the payload-free status.
    #[must_use]
    pub fn status(&self) -> TransferStatus {
        match self {
            Self::Initial => TransferStatus::Initial,
            Self::WaitingForOutgoingConfirmation { .. } => {
                TransferStatus::WaitingForOutgoingConfirmation
            }
            Self::IncomingRequest => TransferStatus::IncomingRequest,
            Self::WaitingForIncomingConfirmation { .. } => {
                TransferStatus::WaitingForIncomingConfirmation
            }
            Self::PerformingActions => TransferStatus::PerformingActions,
            Self::Confirmed => TransferStatus::Confirmed,
            Self::Rejected { reason } => TransferStatus::Rejected(*reason),
        }
    }

    /// Returns true for `Confirmed` and `Rejected`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Rejected { .. })
    }

    /// Returns the leg waiting for a PIN, if any.
    #[must_use]
    pub fn awaiting(&self) -> Option<TransferDirection> {
        match self {
            Self::WaitingForOutgoingConfirmation { .. } => Some(TransferDirection::Outgoing),
            Self::WaitingForIncomingConfirmation { .. } => Some(TransferDirection::Incoming),
            _ => None,
        }
    }

    /// Returns true if the transfer is blocked on a PIN.
    #[must_use]
    pub fn is_awaiting_confirmation(&self) -> bool {
        self.awaiting().is_some()
    }

    /// Performs one step.
    ///
    /// # Errors
    ///
    /// Propagates the error of the leg operation the step needed. The
    /// consumed state is gone in that case; the caller decides how to
    /// reject the transfer.
    pub fn transition<L>(self, legs: &mut L) -> Result<Self, TransferError>
    where
        L: TransferLegs + ?Sized,
    {
        let from = self.status();
        let next = match self {
            Self::Initial => {
                let payload = legs.open_outgoing()?;
                if payload.is_secure() {
                    Self::WaitingForOutgoingConfirmation {
                        payload,
                        failed_attempts: 0,
                    }
                } else {
                    Self::IncomingRequest
                }
            }
            Self::IncomingRequest => {
                let payload = legs.open_incoming()?;
                if payload.is_secure() {
                    Self::WaitingForIncomingConfirmation {
                        payload,
                        failed_attempts: 0,
                    }
                } else {
                    Self::PerformingActions
                }
            }
            Self::PerformingActions => {
                legs.commit()?;
                Self::Confirmed
            }
            waiting_or_terminal => waiting_or_terminal,
        };
        if next.status() != from {
            debug!(from = %from, to = %next.status(), "Transfer transition");
        }
        Ok(next)
    }

    /// Steps until the transfer is terminal or blocked on a PIN.
    ///
    /// # Errors
    ///
    /// See [`TransferState::transition`].
    pub fn settle<L>(mut self, legs: &mut L) -> Result<Self, TransferError>
    where
        L: TransferLegs + ?Sized,
    {
        while !self.is_terminal() && !self.is_awaiting_confirmation() {
            self = self.transition(legs)?;
        }
        Ok(self)
    }

    /// Presents `pin` to the leg going in `direction`.
    ///
    /// A transfer not waiting on that leg is returned unchanged and the
    /// PIN is not looked at. After `max_attempts` mismatches on one leg
    /// the transfer is rejected.
    #[must_use]
    pub fn confirm(
        self,
        direction: TransferDirection,
        pin: &PinCode,
        max_attempts: u32,
    ) -> Confirmation {
        match (self, direction) {
            (
                Self::WaitingForOutgoingConfirmation {
                    payload,
                    failed_attempts,
                },
                TransferDirection::Outgoing,
            ) => check_pin(
                payload,
                failed_attempts,
                pin,
                max_attempts,
                |payload, failed_attempts| Self::WaitingForOutgoingConfirmation {
                    payload,
                    failed_attempts,
                },
                Self::IncomingRequest,
            ),
            (
                Self::WaitingForIncomingConfirmation {
                    payload,
                    failed_attempts,
                },
                TransferDirection::Incoming,
            ) => check_pin(
                payload,
                failed_attempts,
                pin,
                max_attempts,
                |payload, failed_attempts| Self::WaitingForIncomingConfirmation {
                    payload,
                    failed_attempts,
                },
                Self::PerformingActions,
            ),
            (other, _) => Confirmation::Unchanged(other),
        }
    }

    /// Abandons a non-terminal transfer. Terminal states are returned as is.
    #[must_use]
    pub fn reject(self, reason: RejectionReason) -> Self {
        if self.is_terminal() {
            self
        } else {
            Self::Rejected { reason }
        }
    }
}

fn check_pin(
    payload: TransferPayload,
    failed_attempts: u32,
    pin: &PinCode,
    max_attempts: u32,
    waiting: impl FnOnce(TransferPayload, u32) -> TransferState,
    accepted: TransferState,
) -> Confirmation {
    if payload.validate(pin) {
        return Confirmation::Accepted(accepted);
    }
    let failed_attempts = failed_attempts.saturating_add(1);
    let remaining_attempts = max_attempts.saturating_sub(failed_attempts);
    let state = if remaining_attempts == 0 {
        TransferState::Rejected {
            reason: RejectionReason::PinAttemptsExhausted,
        }
    } else {
        waiting(payload, failed_attempts)
    };
    Confirmation::Mismatch {
        state,
        remaining_attempts,
    }
}
