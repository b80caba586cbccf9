//! Records kept by the bank.

use chrono::{DateTime, Utc};
use tally_shared::types::{Amount, TransferId};

use crate::account::AccountType;
use crate::security::SharedSecurity;
use crate::transfer::{TransferRequest, TransferState, TransferStatus};

/// Parameters for opening an account.
#[derive(Clone)]
pub struct OpenAccount {
    /// Display name.
    pub name: String,
    /// Overdraft and fee policy.
    pub account_type: AccountType,
    /// Statement fee; the configured default when `None`.
    pub statement_fee: Option<Amount>,
    /// PIN provider for money entering the account.
    pub incoming_security: Option<SharedSecurity>,
    /// PIN provider for money leaving the account.
    pub outgoing_security: Option<SharedSecurity>,
}

impl OpenAccount {
    /// Creates parameters for an account without transfer security.
    #[must_use]
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            name: name.into(),
            account_type,
            statement_fee: None,
            incoming_security: None,
            outgoing_security: None,
        }
    }

    /// Overrides the configured statement fee.
    #[must_use]
    pub fn with_statement_fee(mut self, fee: Amount) -> Self {
        self.statement_fee = Some(fee);
        self
    }

    /// Requires a PIN for incoming transfers.
    #[must_use]
    pub fn with_incoming_security(mut self, provider: SharedSecurity) -> Self {
        self.incoming_security = Some(provider);
        self
    }

    /// Requires a PIN for outgoing transfers.
    #[must_use]
    pub fn with_outgoing_security(mut self, provider: SharedSecurity) -> Self {
        self.outgoing_security = Some(provider);
        self
    }
}

/// One transfer as tracked by the bank.
///
/// Keyed by its outgoing id; the incoming id is assigned when the
/// receiver leg is opened.
#[derive(Debug)]
pub struct TransferProcess {
    pub(crate) id: TransferId,
    pub(crate) incoming_id: Option<TransferId>,
    pub(crate) request: TransferRequest,
    pub(crate) state: TransferState,
    pub(crate) initiated_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) awaiting_since: DateTime<Utc>,
}

impl TransferProcess {
    pub(crate) fn new(request: TransferRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: TransferId::new(),
            incoming_id: None,
            request,
            state: TransferState::Initial,
            initiated_at: now,
            updated_at: now,
            awaiting_since: now,
        }
    }

    /// Id of the sender leg; the id returned by `initiate`.
    #[must_use]
    pub fn id(&self) -> TransferId {
        self.id
    }

    /// Id of the receiver leg, once opened.
    #[must_use]
    pub fn incoming_id(&self) -> Option<TransferId> {
        self.incoming_id
    }

    /// The transfer request.
    #[must_use]
    pub fn request(&self) -> &TransferRequest {
        &self.request
    }

    /// Current protocol status.
    #[must_use]
    pub fn status(&self) -> TransferStatus {
        self.state.status()
    }

    /// When the transfer was initiated.
    #[must_use]
    pub fn initiated_at(&self) -> DateTime<Utc> {
        self.initiated_at
    }

    /// When the status last changed.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// When the leg currently waiting for a PIN was opened.
    ///
    /// PIN mismatches do not move it.
    #[must_use]
    pub fn awaiting_since(&self) -> DateTime<Utc> {
        self.awaiting_since
    }
}
