//! Transactions and the repository that holds them.
//!
//! This module contains:
//! - The `Transaction` model and `TransactionDraft` for creating transactions
//! - The `TransactionRepository` that owns the ledger and persists it

mod core;
mod repository;

pub(crate) use core::iso_date;
pub use core::{
    Category, TRANSACTION_ID_LENGTH, Transaction, TransactionDraft, TransactionId,
    TransactionType,
};
pub use repository::{TRANSACTIONS_BACKUP_KEY, TRANSACTIONS_KEY, TransactionRepository};
