use thiserror::Error;

use crate::domain::{AccountId, Cents};

/// Failure taxonomy of the balance service. Every rejection names exactly
/// one member; nothing is signalled out-of-band.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Insufficient funds in account {account_id}: balance {balance}, required {required}")]
    InsufficientFunds {
        account_id: AccountId,
        balance: Cents,
        required: Cents,
    },

    #[error("Invalid amount: {0} (must be positive)")]
    InvalidAmount(Cents),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(AccountId),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
