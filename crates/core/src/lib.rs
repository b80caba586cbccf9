//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, policies, and the transfer protocol live here.
//!
//! # Modules
//!
//! - `clock` - Injected time source
//! - `ledger` - Append-only transaction ledger with running balance
//! - `account` - Personal/Premium accounts, overdraft policy, pending transfer legs
//! - `statement` - Filtered, most-recent-first statements with running balances
//! - `security` - Confirmation PINs and their providers
//! - `transfer` - Two-leg transfer confirmation state machine
//! - `bank` - Arena owning accounts and in-flight transfers

pub mod account;
pub mod bank;
pub mod clock;
pub mod ledger;
pub mod security;
pub mod statement;
pub mod transfer;

pub use account::{Account, AccountError, AccountType, AccountTypeError};
pub use bank::{Bank, OpenAccount, TransferProcess};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use ledger::{Ledger, Transaction, TransactionKind};
pub use security::{FixedPinProvider, PinCode, RandomPinProvider, SecurityProvider};
pub use statement::{Statement, StatementLine, TransactionFilter, TransactionPredicate};
pub use transfer::{RejectionReason, TransferError, TransferRequest, TransferStatus};
