use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

pub type AccountId = i64;

/// A per-user balance record.
///
/// Accounts are created once (seeded at bootstrap or explicitly provisioned)
/// and mutated only through the charge protocol; they are never deleted.
/// The balance is non-negative between operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Current balance in cents.
    pub balance: Cents,
    /// Balance the account was created with. Immutable; replaying the audit
    /// trail from this value must reproduce the current balance.
    pub initial_balance: Cents,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: AccountId, initial_balance: Cents) -> Self {
        assert!(initial_balance >= 0, "Initial balance must not be negative");
        Self {
            id,
            balance: initial_balance,
            initial_balance,
            created_at: Utc::now(),
        }
    }

    /// True if the current balance covers a debit of `amount`.
    pub fn can_cover(&self, amount: Cents) -> bool {
        self.balance >= amount
    }
}
