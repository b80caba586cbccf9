//! Pending-transfer registry records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, Amount, TransferId};

use crate::transfer::TransferDirection;

/// One leg of an in-flight transfer, as seen by the account it touches.
///
/// Registered when the leg is opened and removed when the leg is
/// committed to the ledger or the transfer is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransfer {
    /// Id of this leg.
    pub transfer_id: TransferId,
    /// Whether money leaves or enters this account.
    pub direction: TransferDirection,
    /// The other account of the transfer.
    pub counterparty: AccountId,
    /// Amount to move.
    pub amount: Amount,
    /// Description carried to the ledger entry.
    pub description: String,
    /// When the leg was registered.
    pub registered_at: DateTime<Utc>,
}
