//! Common types used across the application.

pub mod amount;
pub mod currency;
pub mod id;

pub use amount::{Amount, AmountError};
pub use currency::Currency;
pub use id::*;
