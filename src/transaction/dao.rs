//! A data access object that owns the connection to the transaction store.

use rusqlite::Connection;

use crate::{
    Error, StoreLocation,
    db::initialize,
    transaction::{
        NewTransaction, Transaction, TransactionId, count_transactions, create_transaction,
        delete_transaction, get_all_transactions, get_transaction,
    },
};

/// Reads and writes transactions in a SQLite database.
///
/// The DAO starts closed. Call [TransactionDao::open] before any other
/// operation; operations on a closed DAO fail with [Error::NotOpen].
///
/// Calls are synchronous and run on the caller's thread. The DAO does no
/// locking of its own, wrap it in a mutex to share it between threads.
#[derive(Debug)]
pub struct TransactionDao {
    location: StoreLocation,
    connection: Option<Connection>,
}

impl TransactionDao {
    /// Create a closed DAO for the database at `location`.
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            connection: None,
        }
    }

    /// Where the database lives.
    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Whether the DAO currently holds a database connection.
    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Open a writable connection to the database and create the schema if
    /// needed. Does nothing if the DAO is already open.
    ///
    /// # Errors
    /// Returns [Error::StoreUnavailable] if the database cannot be opened,
    /// e.g. the parent directory does not exist.
    pub fn open(&mut self) -> Result<(), Error> {
        if self.connection.is_some() {
            tracing::debug!("transaction store at {} is already open", self.location);
            return Ok(());
        }

        let connection = match &self.location {
            StoreLocation::File(path) => Connection::open(path),
            StoreLocation::InMemory => Connection::open_in_memory(),
        }
        .map_err(|error| {
            tracing::error!("could not open transaction store at {}: {error}", self.location);
            Error::StoreUnavailable(error.to_string())
        })?;

        initialize(&connection).map_err(|error| Error::StoreUnavailable(error.to_string()))?;

        tracing::debug!("opened transaction store at {}", self.location);
        self.connection = Some(connection);

        Ok(())
    }

    /// Release the database connection. Closing a closed DAO is a no-op.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if SQLite refuses to close the connection.
    /// The connection is dropped and the DAO is closed either way.
    pub fn close(&mut self) -> Result<(), Error> {
        let Some(connection) = self.connection.take() else {
            return Ok(());
        };

        connection.close().map_err(|(_connection, error)| {
            tracing::warn!("could not cleanly close transaction store at {}: {error}", self.location);
            Error::SqlError(error)
        })?;

        tracing::debug!("closed transaction store at {}", self.location);

        Ok(())
    }

    /// Insert a new transaction and return it as stored, including its ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotOpen] if the DAO is closed,
    /// - [Error::NegativeValue] if the value is negative,
    /// - or [Error::SqlError] if there is some SQL error.
    pub fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        create_transaction(new_transaction, self.connection()?)
    }

    /// Delete `transaction` from the database by its ID.
    ///
    /// Deleting a transaction that is no longer stored is not an error.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotOpen] if the DAO is closed,
    /// - or [Error::SqlError] if there is some SQL error.
    pub fn delete_transaction(&self, transaction: &Transaction) -> Result<(), Error> {
        delete_transaction(transaction.id, self.connection()?)?;

        Ok(())
    }

    /// Every stored transaction, in no particular order.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotOpen] if the DAO is closed,
    /// - or [Error::SqlError] if there is some SQL error.
    pub fn get_all_transactions(&self) -> Result<Vec<Transaction>, Error> {
        get_all_transactions(self.connection()?)
    }

    /// Retrieve a single transaction by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotOpen] if the DAO is closed,
    /// - [Error::NotFound] if `id` does not refer to a stored transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn get_transaction(&self, id: TransactionId) -> Result<Transaction, Error> {
        get_transaction(id, self.connection()?)
    }

    /// The number of stored transactions.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotOpen] if the DAO is closed,
    /// - or [Error::SqlError] if there is some SQL error.
    pub fn count_transactions(&self) -> Result<u32, Error> {
        count_transactions(self.connection()?)
    }

    fn connection(&self) -> Result<&Connection, Error> {
        self.connection.as_ref().ok_or(Error::NotOpen)
    }
}
