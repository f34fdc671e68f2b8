use std::io::Write;

use anyhow::Result;

use crate::application::BalanceService;

/// Exporter for handing ledger data to reconciliation tooling as CSV.
pub struct Exporter<'a> {
    service: &'a BalanceService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a BalanceService) -> Self {
        Self { service }
    }

    /// Export the full audit log to CSV, in insertion order.
    /// Returns the number of rows written.
    pub async fn export_history_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let records = self.service.audit_log().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "account_id", "action", "amount", "timestamp"])?;

        let mut count = 0;
        for record in &records {
            csv_writer.write_record([
                record.id.to_string(),
                record.account_id.to_string(),
                record.action.clone(),
                record.amount.to_string(),
                record.timestamp.to_rfc3339(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export account balances to CSV.
    pub async fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.list_accounts().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["account_id", "balance", "initial_balance", "created_at"])?;

        let mut count = 0;
        for account in &accounts {
            csv_writer.write_record([
                account.id.to_string(),
                account.balance.to_string(),
                account.initial_balance.to_string(),
                account.created_at.to_rfc3339(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }
}
