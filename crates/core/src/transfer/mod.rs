//! Two-leg transfer confirmation protocol.
//!
//! - `types` - Requests, payloads, states and statuses
//! - `protocol` - The step function and PIN confirmation
//! - `error` - Transfer error types
//!
//! The protocol is pure; [`crate::bank::Bank`] owns the accounts and
//! drives it.

pub mod error;
pub mod protocol;
pub mod types;

#[cfg(test)]
mod protocol_props;

pub use error::TransferError;
pub use protocol::{Confirmation, TransferLegs};
pub use types::{
    RejectionReason, TransferDirection, TransferPayload, TransferRequest, TransferState,
    TransferStatus,
};
