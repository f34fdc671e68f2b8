use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{BalanceService, SeedConfig};
use crate::domain::{format_cents, parse_cents, AccountId};

/// Saldo - Account Balance Ledger
#[derive(Parser)]
#[command(name = "saldo")]
#[command(about = "A minimal account-balance ledger with an immutable audit trail")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "saldo.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database and seed the default account
    Init {
        /// Id of the seed account
        #[arg(long, default_value_t = 1)]
        seed_account: AccountId,

        /// Opening balance of the seed account (e.g., "1000" or "1000.00")
        #[arg(long, default_value = "1000")]
        seed_balance: String,
    },

    /// Create a new account
    Create {
        /// Account id (must not exist yet)
        id: AccountId,

        /// Opening balance (e.g., "50.00" or "50")
        #[arg(short, long, default_value = "0")]
        balance: String,
    },

    /// Charge an account: debit the amount and record it in the audit log
    Charge {
        /// Account id
        id: AccountId,

        /// Label describing the operation (e.g., "purchase")
        action: String,

        /// Amount to charge (e.g., "100" or "100.00")
        amount: String,
    },

    /// Show balance for an account or all accounts
    Balance {
        /// Account id (omit for all accounts)
        id: Option<AccountId>,
    },

    /// Show an account's audit trail
    History {
        /// Account id
        id: AccountId,

        /// Maximum number of records to show (most recent first)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Replay every account's history against its balance
    Check,

    /// Export data to CSV
    Export {
        /// What to export: history, balances
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init {
                seed_account,
                seed_balance,
            } => {
                let initial_balance = parse_cents(&seed_balance)
                    .context("Invalid seed balance. Use '1000' or '1000.00'")?;

                let service = BalanceService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);

                let config = SeedConfig {
                    account_id: seed_account,
                    initial_balance,
                };
                if service.seed(&config).await? {
                    println!(
                        "Seeded account {} with balance {}",
                        config.account_id,
                        format_cents(config.initial_balance)
                    );
                } else {
                    println!("Account {} already exists, left untouched", config.account_id);
                }
            }

            Commands::Create { id, balance } => {
                let service = BalanceService::connect(&self.database).await?;
                let initial_balance =
                    parse_cents(&balance).context("Invalid balance. Use '50.00' or '50'")?;

                let account = service.provision_account(id, initial_balance).await?;
                println!(
                    "Created account {} with balance {}",
                    account.id,
                    format_cents(account.balance)
                );
            }

            Commands::Charge { id, action, amount } => {
                let service = BalanceService::connect(&self.database).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount. Use '100.00' or '100'")?;

                let balance = service.charge(id, &action, amount_cents).await?;
                println!(
                    "Charged account {}: {} {}",
                    id,
                    action,
                    format_cents(amount_cents)
                );
                println!("New balance: {}", format_cents(balance));
            }

            Commands::Balance { id } => {
                let service = BalanceService::connect(&self.database).await?;
                run_balance_command(&service, id).await?;
            }

            Commands::History { id, limit, format } => {
                let service = BalanceService::connect(&self.database).await?;
                run_history_command(&service, id, limit, &format).await?;
            }

            Commands::Check => {
                let service = BalanceService::connect(&self.database).await?;
                run_check_command(&service).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = BalanceService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

async fn run_balance_command(service: &BalanceService, id: Option<AccountId>) -> Result<()> {
    match id {
        Some(id) => {
            let balance = service.balance(id).await?;
            println!("Account {}: {}", id, format_cents(balance));
        }
        None => {
            let accounts = service.list_accounts().await?;
            if accounts.is_empty() {
                println!("No accounts found.");
            } else {
                println!("{:<12} {:>14} {:>14}", "ACCOUNT", "BALANCE", "OPENING");
                println!("{}", "-".repeat(42));
                for account in accounts {
                    println!(
                        "{:<12} {:>14} {:>14}",
                        account.id,
                        format_cents(account.balance),
                        format_cents(account.initial_balance)
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_history_command(
    service: &BalanceService,
    id: AccountId,
    limit: Option<usize>,
    format: &str,
) -> Result<()> {
    let records = service.history(id).await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        "table" => {
            if records.is_empty() {
                println!("No records for account {}.", id);
                return Ok(());
            }

            println!(
                "{:<8} {:<20} {:<16} {:<8} {:>12}",
                "ID", "DATE", "ACTION", "KIND", "AMOUNT"
            );
            println!("{}", "-".repeat(68));

            // Most recent first
            let shown = limit.unwrap_or(records.len());
            for record in records.iter().rev().take(shown) {
                println!(
                    "{:<8} {:<20} {:<16} {:<8} {:>12}",
                    record.id,
                    record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    truncate(&record.action, 16),
                    record.kind(),
                    format_cents(record.amount)
                );
            }
        }
        _ => {
            anyhow::bail!("Invalid format '{}'. Valid formats: table, json", format);
        }
    }
    Ok(())
}

async fn run_check_command(service: &BalanceService) -> Result<()> {
    println!("Replaying audit trail...\n");

    let report = service.check_audit_trail().await?;

    println!("Accounts: {}", report.account_count);
    println!("Records:  {}", report.record_count);
    println!();

    if report.is_consistent() {
        println!("Every balance matches its replayed history.");
    } else {
        println!("Issues found:");
        for issue in report.issues() {
            println!("  - {}", issue);
        }
        anyhow::bail!("Audit trail check failed");
    }

    Ok(())
}

async fn run_export_command(
    service: &BalanceService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "history" => {
            let count = exporter.export_history_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} records", count);
            }
        }
        "balances" => {
            let count = exporter.export_balances_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} balances", count);
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: history, balances",
                export_type
            );
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
