//! Account statements.
//!
//! - `filter` - Which transactions make it onto a statement
//! - `builder` - Running-balance fold and most-recent-first ordering
//! - `types` - Statement read model

pub mod builder;
pub mod filter;
pub mod types;

pub use builder::StatementBuilder;
pub use filter::{TransactionFilter, TransactionPredicate, all};
pub use types::{PREVIOUS_BALANCE_DESCRIPTION, Statement, StatementLine};
