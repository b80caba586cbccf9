//! Append-only transaction ledger.
//!
//! - `transaction` - Immutable transaction records and their kinds
//! - `journal` - The per-account ledger with its running balance

pub mod journal;
pub mod transaction;

#[cfg(test)]
mod ledger_props;

pub use journal::Ledger;
pub use transaction::{Transaction, TransactionKind};
