use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::{Account, AccountId, Cents, TransactionRecord};

use super::MIGRATION_001_INITIAL;

/// Durable keyed storage for accounts plus the append-only transaction log.
///
/// The store holds no policy: validation and invariant enforcement live in
/// the balance service; every failure here is a storage failure.
pub struct LedgerStore {
    pool: SqlitePool,
}

impl LedgerStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    // ========================
    // Account operations
    // ========================

    /// Get an account by id. No side effects.
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, balance, initial_balance, created_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    /// Persist the full current state of one account, overwriting any prior
    /// state for that id. This is the write half of a read-modify-write.
    pub async fn save_account(&self, account: &Account) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, balance, initial_balance, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                balance = excluded.balance,
                initial_balance = excluded.initial_balance,
                created_at = excluded.created_at
            "#,
        )
        .bind(account.id)
        .bind(account.balance)
        .bind(account.initial_balance)
        .bind(account.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save account")?;
        Ok(())
    }

    /// Create the seed account if it does not exist yet. Idempotent: an
    /// existing account is left untouched, whatever its current balance.
    /// Returns whether a row was created.
    pub async fn ensure_seed_account(&self, id: AccountId, initial_balance: Cents) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (id, balance, initial_balance, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(initial_balance)
        .bind(initial_balance)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to seed account")?;

        Ok(result.rows_affected() > 0)
    }

    /// List all accounts, ordered by id.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT id, balance, initial_balance, created_at
            FROM accounts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list accounts")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    // ========================
    // Transaction log operations
    // ========================

    /// Append one record to the audit log. The store assigns the id
    /// (monotonic) and the timestamp; the stored record is returned.
    pub async fn append_transaction(
        &self,
        account_id: AccountId,
        action: &str,
        amount: Cents,
    ) -> Result<TransactionRecord> {
        let timestamp = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO transactions (account_id, action, amount, timestamp)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(account_id)
        .bind(action)
        .bind(amount)
        .bind(timestamp.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .context("Failed to append transaction record")?;

        Ok(TransactionRecord {
            id: row.get("id"),
            account_id,
            action: action.to_string(),
            amount,
            timestamp,
        })
    }

    /// List one account's records in insertion order.
    pub async fn list_transactions_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<TransactionRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, action, amount, timestamp
            FROM transactions
            WHERE account_id = ?
            ORDER BY id
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transaction records")?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// List the whole audit log in insertion order.
    pub async fn list_transactions(&self) -> Result<Vec<TransactionRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, action, amount, timestamp
            FROM transactions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transaction records")?;

        rows.iter().map(Self::row_to_record).collect()
    }

    /// Sum the recorded amounts for one account using SQL aggregation.
    pub async fn sum_transactions_for_account(&self, account_id: AccountId) -> Result<Cents> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(amount), 0) as total
            FROM transactions
            WHERE account_id = ?
            "#,
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum transaction records")?;

        Ok(row.get("total"))
    }

    /// Count all records in the audit log.
    pub async fn count_transactions(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM transactions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count transaction records")?;

        Ok(row.get("count"))
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        let created_at_str: String = row.get("created_at");

        Ok(Account {
            id: row.get("id"),
            balance: row.get("balance"),
            initial_balance: row.get("initial_balance"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<TransactionRecord> {
        let timestamp_str: String = row.get("timestamp");

        Ok(TransactionRecord {
            id: row.get("id"),
            account_id: row.get("account_id"),
            action: row.get("action"),
            amount: row.get("amount"),
            timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                .context("Invalid timestamp")?
                .with_timezone(&Utc),
        })
    }
}
