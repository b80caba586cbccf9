//! Bank accounts.
//!
//! - `types` - Account types and their overdraft/fee policy
//! - `entity` - The account aggregate: ledger, statements, transfer legs
//! - `pending` - Registry records for in-flight transfer legs
//! - `error` - Account error types

pub mod entity;
pub mod error;
pub mod pending;
pub mod types;


pub use entity::{Account, STATEMENT_FEE_DESCRIPTION};
pub use error::AccountError;
pub use pending::PendingTransfer;
pub use types::{AccountType, AccountTypeError};
