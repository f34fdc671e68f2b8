use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Cents};

pub type RecordId = i64;

/// One immutable audit entry documenting a single balance change.
/// Records are append-only; a correction is a new compensating entry,
/// never an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Assigned by the store at insert, monotonically increasing.
    pub id: RecordId,
    /// Owning account. Many records per account; insertion order is the
    /// replay order.
    pub account_id: AccountId,
    /// Free-form label for the operation ("purchase", "refund", ...).
    pub action: String,
    /// Signed amount in cents. Debits are negative; the field stays signed
    /// so credits can share the same log.
    pub amount: Cents,
    /// Insertion time, set by the store.
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn is_debit(&self) -> bool {
        self.amount < 0
    }

    pub fn is_credit(&self) -> bool {
        self.amount > 0
    }

    /// "debit" or "credit", for display.
    pub fn kind(&self) -> &'static str {
        if self.is_debit() { "debit" } else { "credit" }
    }
}
