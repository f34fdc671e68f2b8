// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use saldo::application::{BalanceService, SeedConfig};
use saldo::domain::Cents;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(BalanceService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = BalanceService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a test service with account 1 seeded at the given balance
pub async fn seeded_service(initial_balance: Cents) -> Result<(BalanceService, TempDir)> {
    let (service, temp_dir) = test_service().await?;
    service
        .seed(&SeedConfig {
            account_id: 1,
            initial_balance,
        })
        .await?;
    Ok((service, temp_dir))
}
