use serde::Serialize;

use super::{Account, AccountId, Cents, TransactionRecord};

/// Replay an account's audit trail: the opening balance plus every recorded
/// amount, applied in insertion order.
pub fn replay_balance(initial_balance: Cents, records: &[TransactionRecord]) -> Cents {
    records
        .iter()
        .fold(initial_balance, |balance, record| balance + record.amount)
}

/// One account whose stored balance disagrees with its replayed history.
/// This is the drift a crash between the balance write and the audit append
/// can leave behind.
#[derive(Debug, Clone, Serialize)]
pub struct AccountDrift {
    pub account_id: AccountId,
    pub balance: Cents,
    pub replayed: Cents,
}

/// Result of replaying every account's history against its stored balance.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub account_count: usize,
    pub record_count: i64,
    pub drifted: Vec<AccountDrift>,
    pub negative_balances: Vec<AccountId>,
}

impl AuditReport {
    pub fn is_consistent(&self) -> bool {
        self.drifted.is_empty() && self.negative_balances.is_empty()
    }

    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for drift in &self.drifted {
            issues.push(format!(
                "account {}: stored balance {} but history replays to {}",
                drift.account_id, drift.balance, drift.replayed
            ));
        }
        for id in &self.negative_balances {
            issues.push(format!("account {}: balance is negative", id));
        }
        issues
    }
}

/// Build an audit report from each account paired with the sum of its
/// recorded amounts.
pub fn build_audit_report(entries: &[(Account, Cents)], record_count: i64) -> AuditReport {
    let mut drifted = Vec::new();
    let mut negative_balances = Vec::new();

    for (account, recorded_sum) in entries {
        let replayed = account.initial_balance + recorded_sum;
        if replayed != account.balance {
            drifted.push(AccountDrift {
                account_id: account.id,
                balance: account.balance,
                replayed,
            });
        }
        if account.balance < 0 {
            negative_balances.push(account.id);
        }
    }

    AuditReport {
        account_count: entries.len(),
        record_count,
        drifted,
        negative_balances,
    }
}
