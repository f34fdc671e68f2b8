mod common;

use anyhow::Result;
use saldo::application::LedgerError;
use saldo::io::Exporter;

#[tokio::test]
async fn test_audit_trail_is_consistent_after_charges() -> Result<()> {
    let (service, _temp) = common::seeded_service(100000).await?;
    service.provision_account(2, 50000).await?;

    service.charge(1, "purchase", 10000).await?;
    service.charge(1, "purchase", 2500).await?;
    service.charge(2, "subscription", 999).await?;

    let report = service.check_audit_trail().await?;
    assert!(report.is_consistent());
    assert_eq!(report.account_count, 2);
    assert_eq!(report.record_count, 3);
    assert!(report.drifted.is_empty());
    assert!(report.negative_balances.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_audit_trail_on_fresh_ledger() -> Result<()> {
    let (service, _temp) = common::seeded_service(100000).await?;

    let report = service.check_audit_trail().await?;
    assert!(report.is_consistent());
    assert_eq!(report.account_count, 1);
    assert_eq!(report.record_count, 0);

    Ok(())
}

#[tokio::test]
async fn test_history_for_unknown_account() -> Result<()> {
    let (service, _temp) = common::seeded_service(100000).await?;

    let result = service.history(999).await;
    assert!(matches!(result, Err(LedgerError::AccountNotFound(999))));

    Ok(())
}

#[tokio::test]
async fn test_export_history_csv() -> Result<()> {
    let (service, _temp) = common::seeded_service(100000).await?;
    service.charge(1, "purchase", 10000).await?;
    service.charge(1, "refund check", 2500).await?;

    let mut buffer = Vec::new();
    let exporter = Exporter::new(&service);
    let count = exporter.export_history_csv(&mut buffer).await?;
    assert_eq!(count, 2);

    let csv = String::from_utf8(buffer)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "id,account_id,action,amount,timestamp");
    assert!(lines[1].contains("purchase"));
    assert!(lines[1].contains("-10000"));

    Ok(())
}

#[tokio::test]
async fn test_export_balances_csv() -> Result<()> {
    let (service, _temp) = common::seeded_service(100000).await?;
    service.provision_account(2, 0).await?;
    service.charge(1, "purchase", 10000).await?;

    let mut buffer = Vec::new();
    let exporter = Exporter::new(&service);
    let count = exporter.export_balances_csv(&mut buffer).await?;
    assert_eq!(count, 2);

    let csv = String::from_utf8(buffer)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "account_id,balance,initial_balance,created_at");
    assert!(lines[1].starts_with("1,90000,100000,"));
    assert!(lines[2].starts_with("2,0,0,"));

    Ok(())
}

#[tokio::test]
async fn test_audit_log_spans_all_accounts_in_order() -> Result<()> {
    let (service, _temp) = common::seeded_service(100000).await?;
    service.provision_account(2, 50000).await?;

    service.charge(1, "first", 100).await?;
    service.charge(2, "second", 200).await?;
    service.charge(1, "third", 300).await?;

    let log = service.audit_log().await?;
    assert_eq!(log.len(), 3);
    let order: Vec<(&str, i64)> = log.iter().map(|r| (r.action.as_str(), r.account_id)).collect();
    assert_eq!(order, [("first", 1), ("second", 2), ("third", 1)]);

    Ok(())
}
