mod common;

use std::sync::Arc;

use anyhow::Result;
use saldo::application::LedgerError;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_charges_never_overdraw() -> Result<()> {
    // Balance covers 4 unit charges; 10 are attempted concurrently.
    let (service, _temp) = common::seeded_service(4).await?;
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.charge(1, "purchase", 1).await
        }));
    }

    let mut successes = 0;
    let mut rejections = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => successes += 1,
            Err(LedgerError::InsufficientFunds { .. }) => rejections += 1,
            Err(err) => return Err(err.into()),
        }
    }

    assert_eq!(successes, 4, "exactly as many successes as the balance covers");
    assert_eq!(rejections, 6);
    assert_eq!(service.balance(1).await?, 0);

    // One debit record per success, nothing for the rejections
    let records = service.history(1).await?;
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.amount == -1));

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_charges_across_accounts() -> Result<()> {
    let (service, _temp) = common::seeded_service(10000).await?;
    service.provision_account(2, 10000).await?;
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for account_id in [1, 2] {
        for _ in 0..5 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.charge(account_id, "purchase", 1000).await
            }));
        }
    }

    for handle in handles {
        handle.await??;
    }

    assert_eq!(service.balance(1).await?, 5000);
    assert_eq!(service.balance(2).await?, 5000);

    let report = service.check_audit_trail().await?;
    assert!(report.is_consistent());

    Ok(())
}
