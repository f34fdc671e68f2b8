use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::{
    build_audit_report, Account, AccountId, AuditReport, Cents, TransactionRecord,
};
use crate::storage::LedgerStore;

use super::LedgerError;

/// Deployment defaults for the bootstrap seed account. Seeding is an
/// explicit step run once by the process entry point; it is not part of the
/// charge protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedConfig {
    pub account_id: AccountId,
    pub initial_balance: Cents,
}

impl Default for SeedConfig {
    fn default() -> Self {
        // Account 1 with 1000.00
        Self {
            account_id: 1,
            initial_balance: 100_000,
        }
    }
}

/// The balance service: validates a charge and composes the two ledger
/// writes (balance overwrite, audit append) into one effectively-atomic
/// unit from the caller's point of view.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct BalanceService {
    store: LedgerStore,
    /// One lock per account id, held across the read-check-write-append
    /// sequence of a charge. Two charges against the same account never
    /// interleave; charges against different accounts share nothing.
    account_locks: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl BalanceService {
    /// Create a new balance service on top of the given ledger store.
    pub fn new(store: LedgerStore) -> Self {
        Self {
            store,
            account_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, LedgerError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = LedgerStore::init(&db_url).await?;
        Ok(Self::new(store))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, LedgerError> {
        let db_url = format!("sqlite:{}", database_path);
        let store = LedgerStore::connect(&db_url).await?;
        Ok(Self::new(store))
    }

    async fn lock_for(&self, id: AccountId) -> Arc<Mutex<()>> {
        let mut locks = self.account_locks.lock().await;
        locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // ========================
    // The charge protocol
    // ========================

    /// Debit `amount` from an account and append the matching audit record.
    ///
    /// The balance write is durably applied before the append is attempted,
    /// so a record only ever documents a mutation that already happened. A
    /// failure between the two leaves a balance change without its record;
    /// that partial completion is logged for reconciliation and the storage
    /// failure is surfaced. No retries happen here.
    ///
    /// Returns the post-charge balance. On any rejection the account and its
    /// record set are left untouched.
    pub async fn charge(
        &self,
        account_id: AccountId,
        action: &str,
        amount: Cents,
    ) -> Result<Cents, LedgerError> {
        // The boundary validates amounts; reject non-positive ones anyway.
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let lock = self.lock_for(account_id).await;
        let _guard = lock.lock().await;

        let mut account = self
            .store
            .get_account(account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        if !account.can_cover(amount) {
            return Err(LedgerError::InsufficientFunds {
                account_id,
                balance: account.balance,
                required: amount,
            });
        }

        account.balance -= amount;
        self.store.save_account(&account).await?;

        // The balance overwrite is committed at this point. If the append
        // fails the mutation stands; flag the account so reconciliation can
        // restore the missing record.
        let record = match self.store.append_transaction(account_id, action, -amount).await {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    account_id,
                    amount, "balance updated but audit record append failed"
                );
                return Err(LedgerError::Storage(err));
            }
        };

        info!(
            account_id,
            record_id = record.id,
            action,
            balance = account.balance,
            "charge applied"
        );

        Ok(account.balance)
    }

    // ========================
    // Bootstrap and provisioning
    // ========================

    /// Ensure the configured seed account exists. Idempotent; an existing
    /// account keeps its balance. Returns whether an account was created.
    pub async fn seed(&self, config: &SeedConfig) -> Result<bool, LedgerError> {
        let created = self
            .store
            .ensure_seed_account(config.account_id, config.initial_balance)
            .await?;

        if created {
            info!(
                account_id = config.account_id,
                balance = config.initial_balance,
                "seeded default account"
            );
        } else {
            info!(account_id = config.account_id, "seed account already exists");
        }

        Ok(created)
    }

    /// Create a new account with an opening balance.
    pub async fn provision_account(
        &self,
        id: AccountId,
        initial_balance: Cents,
    ) -> Result<Account, LedgerError> {
        if initial_balance < 0 {
            return Err(LedgerError::InvalidAmount(initial_balance));
        }
        if self.store.get_account(id).await?.is_some() {
            return Err(LedgerError::AccountAlreadyExists(id));
        }

        let account = Account::new(id, initial_balance);
        self.store.save_account(&account).await?;
        Ok(account)
    }

    // ========================
    // Queries
    // ========================

    /// Current balance of one account.
    pub async fn balance(&self, account_id: AccountId) -> Result<Cents, LedgerError> {
        let account = self
            .store
            .get_account(account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        Ok(account.balance)
    }

    /// All accounts, ordered by id.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self.store.list_accounts().await?)
    }

    /// One account's audit trail in insertion order.
    pub async fn history(&self, account_id: AccountId) -> Result<Vec<TransactionRecord>, LedgerError> {
        if self.store.get_account(account_id).await?.is_none() {
            return Err(LedgerError::AccountNotFound(account_id));
        }
        Ok(self.store.list_transactions_for_account(account_id).await?)
    }

    /// The whole audit log in insertion order.
    pub async fn audit_log(&self) -> Result<Vec<TransactionRecord>, LedgerError> {
        Ok(self.store.list_transactions().await?)
    }

    // ========================
    // Audit replay
    // ========================

    /// Replay every account's history against its stored balance and report
    /// any drift.
    pub async fn check_audit_trail(&self) -> Result<AuditReport, LedgerError> {
        let accounts = self.store.list_accounts().await?;

        let mut entries = Vec::with_capacity(accounts.len());
        for account in accounts {
            let recorded_sum = self.store.sum_transactions_for_account(account.id).await?;
            entries.push((account, recorded_sum));
        }

        let record_count = self.store.count_transactions().await?;
        Ok(build_audit_report(&entries, record_count))
    }
}
