mod common;

use anyhow::Result;
use saldo::application::SeedConfig;

#[tokio::test]
async fn test_seeding_is_idempotent() -> Result<()> {
    let (service, _temp) = common::test_service().await?;
    let config = SeedConfig::default();

    assert!(service.seed(&config).await?);
    assert!(!service.seed(&config).await?);

    let accounts = service.list_accounts().await?;
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, 1);
    assert_eq!(accounts[0].balance, 100000);

    Ok(())
}

#[tokio::test]
async fn test_reseeding_does_not_reset_a_charged_account() -> Result<()> {
    let (service, _temp) = common::test_service().await?;
    let config = SeedConfig::default();
    service.seed(&config).await?;

    service.charge(1, "purchase", 10000).await?;
    assert!(!service.seed(&config).await?);

    assert_eq!(service.balance(1).await?, 90000);
    assert_eq!(service.history(1).await?.len(), 1);

    Ok(())
}

#[test]
fn test_seed_defaults() {
    let config = SeedConfig::default();
    assert_eq!(config.account_id, 1);
    assert_eq!(config.initial_balance, 100000);
}

#[tokio::test]
async fn test_seeding_a_custom_account() -> Result<()> {
    let (service, _temp) = common::test_service().await?;
    let config = SeedConfig {
        account_id: 42,
        initial_balance: 2500,
    };
    service.seed(&config).await?;

    assert_eq!(service.balance(42).await?, 2500);

    Ok(())
}
