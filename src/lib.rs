//! MyPocket is a small personal-finance data layer.
//!
//! It records income and expense transactions, links them to categories and
//! accounts by ID and keeps them in a local SQLite database.
//!
//! The main entry point is [TransactionDao], which owns the database handle.
//! The same operations are also available as free functions that take an
//! explicit [rusqlite::Connection], e.g. [create_transaction].

#![warn(missing_docs)]

mod config;
mod database_id;
mod db;
mod transaction;

pub use config::StoreLocation;
pub use database_id::{AccountId, CategoryId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use transaction::{
    NewTransaction, Transaction, TransactionDao, TransactionType, count_transactions,
    create_transaction, delete_transaction, get_all_transactions, get_transaction,
};

/// The errors that may occur when working with the transaction store.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The database could not be opened or its schema could not be created.
    ///
    /// Callers should pass in the original error as a string.
    #[error("the transaction store is unavailable: {0}")]
    StoreUnavailable(String),

    /// A data operation was attempted while the store was closed, i.e. before
    /// [TransactionDao::open] or after [TransactionDao::close].
    #[error("the transaction store has not been opened")]
    NotOpen,

    /// A transaction was given a negative (or NaN) value.
    ///
    /// Whether money was earned or spent is recorded by the
    /// [TransactionType], so values are always non-negative.
    #[error("{0} is not a valid transaction value, values must be non-negative")]
    NegativeValue(f64),

    /// An integer that does not map to a [TransactionType].
    #[error("{0} is not a valid transaction type")]
    InvalidTransactionType(i64),

    /// The requested transaction was not found.
    ///
    /// Internally, this error occurs when a query returns no rows.
    #[error("the requested transaction could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
