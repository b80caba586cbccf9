//! Account aggregate.
//!
//! The account owns its ledger and its pending-transfer registry. Every
//! mutating method validates first and mutates last, so a returned error
//! always means nothing changed.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use tally_shared::BankConfig;
use tally_shared::types::{AccountId, Amount, TransactionId, TransferId};
use tracing::{debug, info, warn};

use super::error::AccountError;
use super::pending::PendingTransfer;
use super::types::AccountType;
use crate::clock::SharedClock;
use crate::ledger::{Ledger, Transaction, TransactionKind};
use crate::security::SharedSecurity;
use crate::statement::{Statement, StatementBuilder, TransactionPredicate};
use crate::transfer::{TransferDirection, TransferPayload, TransferRequest};

/// Description of the fee entry posted by statement creation.
pub const STATEMENT_FEE_DESCRIPTION: &str = "Statement fee";

/// A bank account.
pub struct Account {
    id: AccountId,
    name: String,
    account_type: AccountType,
    statement_fee: Amount,
    incoming_security: Option<SharedSecurity>,
    outgoing_security: Option<SharedSecurity>,
    clock: SharedClock,
    ledger: Ledger,
    pending: HashMap<TransferId, PendingTransfer>,
}

impl Account {
    /// Opens an empty account with no transfer security, charging the
    /// default configured statement fee.
    #[must_use]
    pub fn new(name: impl Into<String>, account_type: AccountType, clock: SharedClock) -> Self {
        let account = Self {
            id: AccountId::new(),
            name: name.into(),
            account_type,
            statement_fee: BankConfig::default().statement_fee,
            incoming_security: None,
            outgoing_security: None,
            clock,
            ledger: Ledger::new(),
            pending: HashMap::new(),
        };
        info!(
            account_id = %account.id,
            account_type = %account.account_type,
            "Account opened"
        );
        account
    }

    /// Sets the fee posted when a personal account creates a statement.
    #[must_use]
    pub fn with_statement_fee(mut self, fee: Amount) -> Self {
        self.statement_fee = fee;
        self
    }

    /// Requires a PIN from `provider` to confirm money entering the account.
    #[must_use]
    pub fn with_incoming_security(mut self, provider: SharedSecurity) -> Self {
        self.incoming_security = Some(provider);
        self
    }

    /// Requires a PIN from `provider` to confirm money leaving the account.
    #[must_use]
    pub fn with_outgoing_security(mut self, provider: SharedSecurity) -> Self {
        self.outgoing_security = Some(provider);
        self
    }

    /// Returns the account id.
    #[must_use]
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the account type.
    #[must_use]
    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Returns true if outgoing transfers need a PIN.
    #[must_use]
    pub fn has_outgoing_security(&self) -> bool {
        self.outgoing_security.is_some()
    }

    /// Returns true if incoming transfers need a PIN.
    #[must_use]
    pub fn has_incoming_security(&self) -> bool {
        self.incoming_security.is_some()
    }

    /// Pays `amount` into the account.
    ///
    /// # Errors
    ///
    /// `AccountError::InvalidAmount` if `amount` is negative.
    pub fn deposit(
        &mut self,
        amount: Amount,
        description: impl Into<String>,
    ) -> Result<TransactionId, AccountError> {
        self.post_credit(TransactionKind::Deposit, amount, description.into())
    }

    /// Takes `amount` out of the account.
    ///
    /// # Errors
    ///
    /// - `AccountError::InvalidAmount` if `amount` is negative.
    /// - `AccountError::OverdraftDenied` if the account type forbids the
    ///   resulting balance.
    pub fn withdraw(
        &mut self,
        amount: Amount,
        description: impl Into<String>,
    ) -> Result<TransactionId, AccountError> {
        self.post_debit(TransactionKind::Withdrawal, amount, description.into())
    }

    /// Returns the current balance.
    #[must_use]
    pub fn balance(&self) -> Amount {
        self.ledger.balance()
    }

    /// Builds a statement of the transactions accepted by `filter`.
    ///
    /// Personal accounts are charged the statement fee first; the fee entry
    /// always appears on the statement, whatever the filter says. Balances
    /// on the lines are the account's real balances, filter or not.
    ///
    /// # Errors
    ///
    /// `AccountError::OverdraftDenied` if the fee cannot be covered. No fee
    /// is posted and no statement is produced in that case.
    pub fn create_statement<P>(&mut self, filter: &P) -> Result<Statement, AccountError>
    where
        P: TransactionPredicate + ?Sized,
    {
        let fee_id = if self.account_type.charges_statement_fee() && self.statement_fee.is_positive()
        {
            Some(self.post_debit(
                TransactionKind::Cost,
                self.statement_fee,
                STATEMENT_FEE_DESCRIPTION.to_string(),
            )?)
        } else {
            None
        };

        Ok(StatementBuilder::new().build_selected(&self.ledger, |tx| {
            Some(tx.id) == fee_id || filter.accepts(tx)
        }))
    }

    /// Looks up a transaction by id.
    #[must_use]
    pub fn find(&self, id: TransactionId) -> Option<&Transaction> {
        self.ledger.find(id)
    }

    /// Returns every transaction in insertion order.
    #[must_use]
    pub fn find_all(&self) -> &[Transaction] {
        self.ledger.entries()
    }

    /// Returns the ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Checks that `amount` could be debited right now.
    ///
    /// # Errors
    ///
    /// `AccountError::OverdraftDenied` if the account type forbids it.
    pub fn ensure_can_debit(&self, amount: Amount) -> Result<(), AccountError> {
        let available = self.balance();
        if self.account_type.permits_debit(available, amount) {
            Ok(())
        } else {
            warn!(
                account_id = %self.id,
                requested = %amount,
                available = %available,
                "Overdraft denied"
            );
            Err(AccountError::OverdraftDenied {
                requested: amount,
                available,
            })
        }
    }

    /// Returns the in-flight transfer legs touching this account.
    pub fn pending_transfers(&self) -> impl Iterator<Item = &PendingTransfer> {
        self.pending.values()
    }

    /// Looks up an in-flight transfer leg.
    #[must_use]
    pub fn pending(&self, transfer_id: TransferId) -> Option<&PendingTransfer> {
        self.pending.get(&transfer_id)
    }

    /// Registers the sender leg of `request` and returns its payload.
    pub(crate) fn open_outgoing(
        &mut self,
        transfer_id: TransferId,
        request: &TransferRequest,
        now: DateTime<Utc>,
    ) -> Result<TransferPayload, AccountError> {
        let payload = payload_for(self.outgoing_security.as_ref(), transfer_id, request);
        self.register(PendingTransfer {
            transfer_id,
            direction: TransferDirection::Outgoing,
            counterparty: request.to,
            amount: request.amount,
            description: request.description.clone(),
            registered_at: now,
        })?;
        Ok(payload)
    }

    /// Registers the receiver leg of `request` and returns its payload.
    pub(crate) fn open_incoming(
        &mut self,
        transfer_id: TransferId,
        request: &TransferRequest,
        now: DateTime<Utc>,
    ) -> Result<TransferPayload, AccountError> {
        let payload = payload_for(self.incoming_security.as_ref(), transfer_id, request);
        self.register(PendingTransfer {
            transfer_id,
            direction: TransferDirection::Incoming,
            counterparty: request.from,
            amount: request.amount,
            description: request.description.clone(),
            registered_at: now,
        })?;
        Ok(payload)
    }

    /// Checks that `transfer_id` is a registered leg going in `direction`
    /// that could be committed right now.
    pub(crate) fn ensure_can_commit(
        &self,
        transfer_id: TransferId,
        direction: TransferDirection,
    ) -> Result<(), AccountError> {
        let pending = self
            .pending
            .get(&transfer_id)
            .filter(|p| p.direction == direction)
            .ok_or(AccountError::TransferNotFound(transfer_id))?;
        match direction {
            TransferDirection::Outgoing => self.ensure_can_debit(pending.amount),
            TransferDirection::Incoming => Ok(()),
        }
    }

    /// Posts the `TransferOut` entry of a registered sender leg.
    pub(crate) fn confirm_outgoing(
        &mut self,
        transfer_id: TransferId,
    ) -> Result<TransactionId, AccountError> {
        self.ensure_can_commit(transfer_id, TransferDirection::Outgoing)?;
        let pending = self
            .pending
            .remove(&transfer_id)
            .ok_or(AccountError::TransferNotFound(transfer_id))?;
        self.post_debit(TransactionKind::TransferOut, pending.amount, pending.description)
    }

    /// Posts the `TransferIn` entry of a registered receiver leg.
    pub(crate) fn confirm_incoming(
        &mut self,
        transfer_id: TransferId,
    ) -> Result<TransactionId, AccountError> {
        self.ensure_can_commit(transfer_id, TransferDirection::Incoming)?;
        let pending = self
            .pending
            .remove(&transfer_id)
            .ok_or(AccountError::TransferNotFound(transfer_id))?;
        self.post_credit(TransactionKind::TransferIn, pending.amount, pending.description)
    }

    /// Drops a registered leg without posting anything.
    pub(crate) fn release_pending(&mut self, transfer_id: TransferId) -> Option<PendingTransfer> {
        let released = self.pending.remove(&transfer_id);
        if released.is_some() {
            debug!(account_id = %self.id, transfer_id = %transfer_id, "Pending transfer released");
        }
        released
    }

    fn register(&mut self, pending: PendingTransfer) -> Result<(), AccountError> {
        if self.pending.contains_key(&pending.transfer_id) {
            return Err(AccountError::DuplicateTransfer(pending.transfer_id));
        }
        debug!(
            account_id = %self.id,
            transfer_id = %pending.transfer_id,
            direction = %pending.direction,
            "Pending transfer registered"
        );
        self.pending.insert(pending.transfer_id, pending);
        Ok(())
    }

    fn post_credit(
        &mut self,
        kind: TransactionKind,
        amount: Amount,
        description: String,
    ) -> Result<TransactionId, AccountError> {
        if amount.is_negative() {
            return Err(AccountError::InvalidAmount(amount));
        }
        Ok(self.append(kind, amount, description))
    }

    fn post_debit(
        &mut self,
        kind: TransactionKind,
        amount: Amount,
        description: String,
    ) -> Result<TransactionId, AccountError> {
        if amount.is_negative() {
            return Err(AccountError::InvalidAmount(amount));
        }
        self.ensure_can_debit(amount)?;
        Ok(self.append(kind, amount, description))
    }

    fn append(&mut self, kind: TransactionKind, amount: Amount, description: String) -> TransactionId {
        let transaction = Transaction::new(kind, amount, self.clock.now(), description);
        let id = self.ledger.append(transaction);
        debug!(
            account_id = %self.id,
            transaction_id = %id,
            kind = %kind,
            amount = %amount,
            balance = %self.ledger.balance(),
            "Transaction posted"
        );
        id
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("account_type", &self.account_type)
            .field("balance", &self.ledger.balance())
            .field("transactions", &self.ledger.len())
            .field("pending", &self.pending.len())
            .field("incoming_security", &self.incoming_security.is_some())
            .field("outgoing_security", &self.outgoing_security.is_some())
            .finish_non_exhaustive()
    }
}

fn payload_for(
    security: Option<&SharedSecurity>,
    transfer_id: TransferId,
    request: &TransferRequest,
) -> TransferPayload {
    match security {
        Some(provider) => TransferPayload::Secure {
            transfer_id,
            code: provider.generate(),
            request: request.clone(),
        },
        None => TransferPayload::NotSecure {
            transfer_id,
            request: request.clone(),
        },
    }
}
