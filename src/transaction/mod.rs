//! Transaction management for the finance application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `NewTransaction` for creating transactions
//! - Database functions for storing, querying, and deleting transactions
//! - The `TransactionDao` that owns the database connection

mod core;
mod dao;

pub use self::core::{
    NewTransaction, Transaction, TransactionType, count_transactions, create_transaction,
    create_transaction_table, delete_transaction, get_all_transactions, get_transaction,
};
pub use dao::TransactionDao;

pub use crate::database_id::TransactionId;
