//! The bank: an arena of accounts and in-flight transfers.
//!
//! Accounts never reference each other. A transfer names its two
//! accounts by id and the bank lends them to the state machine for the
//! duration of one call, so a `&mut Bank` is all the locking a transfer
//! needs: at most one caller is ever inside `PerformingActions`.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use tally_shared::AppConfig;
use tally_shared::types::{AccountId, TransferId};
use tracing::{debug, info, warn};

use super::process::{OpenAccount, TransferProcess};
use crate::account::{Account, AccountError};
use crate::clock::SharedClock;
use crate::security::PinCode;
use crate::transfer::{
    Confirmation, RejectionReason, TransferDirection, TransferError, TransferLegs,
    TransferPayload, TransferRequest, TransferState, TransferStatus,
};

/// Owns every account and every transfer.
pub struct Bank {
    config: AppConfig,
    clock: SharedClock,
    accounts: HashMap<AccountId, Account>,
    transfers: HashMap<TransferId, TransferProcess>,
    incoming_index: HashMap<TransferId, TransferId>,
}

impl Bank {
    /// Creates an empty bank.
    #[must_use]
    pub fn new(config: AppConfig, clock: SharedClock) -> Self {
        Self {
            config,
            clock,
            accounts: HashMap::new(),
            transfers: HashMap::new(),
            incoming_index: HashMap::new(),
        }
    }

    /// Returns the configuration the bank runs with.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Opens an account and returns its id.
    pub fn open_account(&mut self, params: OpenAccount) -> AccountId {
        let fee = params
            .statement_fee
            .unwrap_or(self.config.bank.statement_fee);
        let mut account = Account::new(params.name, params.account_type, self.clock.clone())
            .with_statement_fee(fee);
        if let Some(provider) = params.incoming_security {
            account = account.with_incoming_security(provider);
        }
        if let Some(provider) = params.outgoing_security {
            account = account.with_outgoing_security(provider);
        }
        let id = account.id();
        self.accounts.insert(id, account);
        id
    }

    /// Looks up an account.
    #[must_use]
    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Looks up an account for deposits, withdrawals and statements.
    pub fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(&id)
    }

    /// Iterates over every account.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Looks up a transfer by its outgoing or incoming id.
    #[must_use]
    pub fn transfer(&self, id: TransferId) -> Option<&TransferProcess> {
        let key = self.incoming_index.get(&id).copied().unwrap_or(id);
        self.transfers.get(&key)
    }

    /// Iterates over every transfer, finished ones included.
    pub fn transfers(&self) -> impl Iterator<Item = &TransferProcess> {
        self.transfers.values()
    }

    /// Starts a transfer and drives it as far as it goes without a PIN.
    ///
    /// Returns the outgoing transfer id.
    ///
    /// # Errors
    ///
    /// - `TransferError::InvalidAmount` if the amount is not positive.
    /// - `TransferError::SameAccount` if both ends are the same account.
    /// - `TransferError::AccountNotFound` if either account is unknown.
    /// - `TransferError::Account(OverdraftDenied)` if the sender cannot
    ///   cover the amount.
    pub fn initiate(&mut self, request: TransferRequest) -> Result<TransferId, TransferError> {
        if !request.amount.is_positive() {
            return Err(TransferError::InvalidAmount(request.amount));
        }
        if request.from == request.to {
            return Err(TransferError::SameAccount(request.from));
        }
        let sender = lookup(&self.accounts, request.from)?;
        lookup(&self.accounts, request.to)?;
        sender.ensure_can_debit(request.amount)?;

        let mut process = TransferProcess::new(request, self.clock.now());
        let id = process.id;
        info!(
            transfer_id = %id,
            from = %process.request.from,
            to = %process.request.to,
            amount = %process.request.amount,
            "Transfer initiated"
        );

        let outcome = drive(&mut self.accounts, &mut process, self.clock.now());
        self.store(process);
        outcome.map(|()| id)
    }

    /// Presents the sender's PIN for the transfer with outgoing id `id`.
    ///
    /// Confirming a transfer that is not waiting on its sender returns the
    /// current status and does nothing.
    ///
    /// # Errors
    ///
    /// - `TransferError::TransferNotFound` for an unknown outgoing id.
    /// - `TransferError::PinMismatch` if the PIN does not validate.
    /// - `TransferError::Account` if committing the transfer failed.
    pub fn confirm_outgoing(
        &mut self,
        id: TransferId,
        pin: &PinCode,
    ) -> Result<TransferStatus, TransferError> {
        let key = self
            .transfers
            .contains_key(&id)
            .then_some(id)
            .ok_or(TransferError::TransferNotFound(id))?;
        self.confirm(key, TransferDirection::Outgoing, pin)
    }

    /// Presents the receiver's PIN for the transfer with incoming id `id`.
    ///
    /// Confirming a transfer that is not waiting on its receiver returns
    /// the current status and does nothing.
    ///
    /// # Errors
    ///
    /// Same as [`Bank::confirm_outgoing`], for an unknown incoming id.
    pub fn confirm_incoming(
        &mut self,
        id: TransferId,
        pin: &PinCode,
    ) -> Result<TransferStatus, TransferError> {
        let key = self
            .incoming_index
            .get(&id)
            .copied()
            .ok_or(TransferError::TransferNotFound(id))?;
        self.confirm(key, TransferDirection::Incoming, pin)
    }

    /// Re-drives a transfer. A no-op on blocked or terminal transfers.
    ///
    /// # Errors
    ///
    /// `TransferError::TransferNotFound` for an unknown id, or the error
    /// of the step that failed.
    pub fn advance(&mut self, id: TransferId) -> Result<TransferStatus, TransferError> {
        let key = self.incoming_index.get(&id).copied().unwrap_or(id);
        let mut process = self
            .transfers
            .remove(&key)
            .ok_or(TransferError::TransferNotFound(id))?;
        let outcome = drive(&mut self.accounts, &mut process, self.clock.now());
        let status = process.status();
        self.store(process);
        outcome.map(|()| status)
    }

    /// Rejects every transfer that has waited for a PIN longer than the
    /// configured TTL. Returns the outgoing ids of the expired transfers.
    ///
    /// The TTL applies per leg: a receiver leg gets the full TTL from the
    /// moment the sender's PIN is accepted.
    pub fn expire_pending(&mut self) -> Vec<TransferId> {
        let now = self.clock.now();
        let ttl = self.config.security.pending_transfer_ttl();
        let mut expired = Vec::new();

        for process in self.transfers.values_mut() {
            if process.state.is_awaiting_confirmation()
                && now.signed_duration_since(process.awaiting_since) > ttl
            {
                reject(&mut self.accounts, process, RejectionReason::Expired, now);
                expired.push(process.id);
            }
        }

        if !expired.is_empty() {
            info!(count = expired.len(), "Expired pending transfers");
        }
        expired
    }

    fn confirm(
        &mut self,
        key: TransferId,
        direction: TransferDirection,
        pin: &PinCode,
    ) -> Result<TransferStatus, TransferError> {
        let now = self.clock.now();
        let ttl = self.config.security.pending_transfer_ttl();
        let max_attempts = self.config.security.max_pin_attempts;
        let mut process = self
            .transfers
            .remove(&key)
            .ok_or(TransferError::TransferNotFound(key))?;

        if process.state.awaiting() == Some(direction)
            && now.signed_duration_since(process.awaiting_since) > ttl
        {
            reject(&mut self.accounts, &mut process, RejectionReason::Expired, now);
            let status = process.status();
            self.store(process);
            return Ok(status);
        }

        let state = std::mem::replace(&mut process.state, TransferState::Initial);
        let outcome = match state.confirm(direction, pin, max_attempts) {
            Confirmation::Accepted(next) => {
                debug!(transfer_id = %process.id, direction = %direction, "PIN accepted");
                process.state = next;
                process.updated_at = now;
                drive(&mut self.accounts, &mut process, now)
            }
            Confirmation::Mismatch {
                state,
                remaining_attempts,
            } => {
                warn!(
                    transfer_id = %process.id,
                    direction = %direction,
                    remaining_attempts,
                    "PIN mismatch"
                );
                process.state = state;
                process.updated_at = now;
                if process.state.is_terminal() {
                    release(&mut self.accounts, &process);
                    warn!(
                        transfer_id = %process.id,
                        status = %process.status(),
                        "Transfer rejected"
                    );
                }
                Err(TransferError::PinMismatch { remaining_attempts })
            }
            Confirmation::Unchanged(state) => {
                process.state = state;
                Ok(())
            }
        };

        let status = process.status();
        self.store(process);
        outcome.map(|()| status)
    }

    fn store(&mut self, process: TransferProcess) {
        if let Some(incoming_id) = process.incoming_id {
            self.incoming_index.insert(incoming_id, process.id);
        }
        self.transfers.insert(process.id, process);
    }
}

impl fmt::Debug for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bank")
            .field("config", &self.config)
            .field("accounts", &self.accounts.len())
            .field("transfers", &self.transfers.len())
            .finish_non_exhaustive()
    }
}

/// Settles `process`, rejecting it if a step fails.
fn drive(
    accounts: &mut HashMap<AccountId, Account>,
    process: &mut TransferProcess,
    now: DateTime<Utc>,
) -> Result<(), TransferError> {
    let state = std::mem::replace(&mut process.state, TransferState::Initial);
    let before = state.status();
    let mut legs = BankLegs {
        accounts: &mut *accounts,
        request: &process.request,
        outgoing_id: process.id,
        incoming_id: &mut process.incoming_id,
        now,
    };

    match state.settle(&mut legs) {
        Ok(next) => {
            if next.status() != before {
                process.updated_at = now;
                if next.is_awaiting_confirmation() {
                    process.awaiting_since = now;
                }
            }
            process.state = next;
            Ok(())
        }
        Err(err) => {
            let reason = if matches!(
                err,
                TransferError::Account(AccountError::OverdraftDenied { .. })
            ) {
                RejectionReason::InsufficientFunds
            } else {
                RejectionReason::Aborted
            };
            reject(accounts, process, reason, now);
            Err(err)
        }
    }
}

fn reject(
    accounts: &mut HashMap<AccountId, Account>,
    process: &mut TransferProcess,
    reason: RejectionReason,
    now: DateTime<Utc>,
) {
    let state = std::mem::replace(&mut process.state, TransferState::Initial);
    process.state = state.reject(reason);
    process.updated_at = now;
    release(accounts, process);
    warn!(transfer_id = %process.id, reason = %reason, "Transfer rejected");
}

/// Drops both registry entries of a transfer.
fn release(accounts: &mut HashMap<AccountId, Account>, process: &TransferProcess) {
    if let Some(sender) = accounts.get_mut(&process.request.from) {
        sender.release_pending(process.id);
    }
    if let (Some(incoming_id), Some(receiver)) =
        (process.incoming_id, accounts.get_mut(&process.request.to))
    {
        receiver.release_pending(incoming_id);
    }
}

fn lookup(
    accounts: &HashMap<AccountId, Account>,
    id: AccountId,
) -> Result<&Account, TransferError> {
    accounts.get(&id).ok_or(TransferError::AccountNotFound(id))
}

fn lookup_mut(
    accounts: &mut HashMap<AccountId, Account>,
    id: AccountId,
) -> Result<&mut Account, TransferError> {
    accounts
        .get_mut(&id)
        .ok_or(TransferError::AccountNotFound(id))
}

/// The two accounts of one transfer, lent to the state machine.
struct BankLegs<'a> {
    accounts: &'a mut HashMap<AccountId, Account>,
    request: &'a TransferRequest,
    outgoing_id: TransferId,
    incoming_id: &'a mut Option<TransferId>,
    now: DateTime<Utc>,
}

impl TransferLegs for BankLegs<'_> {
    fn open_outgoing(&mut self) -> Result<TransferPayload, TransferError> {
        let sender = lookup_mut(self.accounts, self.request.from)?;
        Ok(sender.open_outgoing(self.outgoing_id, self.request, self.now)?)
    }

    fn open_incoming(&mut self) -> Result<TransferPayload, TransferError> {
        let incoming_id = *self.incoming_id.get_or_insert_with(TransferId::new);
        let receiver = lookup_mut(self.accounts, self.request.to)?;
        Ok(receiver.open_incoming(incoming_id, self.request, self.now)?)
    }

    fn commit(&mut self) -> Result<(), TransferError> {
        let incoming_id = self
            .incoming_id
            .ok_or(TransferError::TransferNotFound(self.outgoing_id))?;

        lookup(self.accounts, self.request.from)?
            .ensure_can_commit(self.outgoing_id, TransferDirection::Outgoing)?;
        lookup(self.accounts, self.request.to)?
            .ensure_can_commit(incoming_id, TransferDirection::Incoming)?;

        lookup_mut(self.accounts, self.request.from)?.confirm_outgoing(self.outgoing_id)?;
        lookup_mut(self.accounts, self.request.to)?.confirm_incoming(incoming_id)?;

        info!(
            transfer_id = %self.outgoing_id,
            incoming_id = %incoming_id,
            amount = %self.request.amount,
            "Transfer committed"
        );
        Ok(())
    }
}
