//! Defines the core data models and database queries for transactions.

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{AccountId, CategoryId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was spent or earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money was earned, e.g. a salary payment.
    Income,
    /// Money was spent, e.g. a coffee.
    Expense,
}

impl TransactionType {
    /// The integer used to store the type in the database.
    pub fn as_i64(self) -> i64 {
        match self {
            TransactionType::Income => 0,
            TransactionType::Expense => 1,
        }
    }
}

impl TryFrom<i64> for TransactionType {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TransactionType::Income),
            1 => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other)),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_i64()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_i64()?;

        TransactionType::try_from(raw).map_err(|_| FromSqlError::OutOfRange(raw))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Values of this type are only produced by reading from the database, so the
/// `id` always refers to a stored row at the time of reading.
/// To create a new transaction, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the transaction is an expense or income.
    pub transaction_type: TransactionType,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, never negative.
    pub value: f64,
    /// When the transaction happened, which is not necessarily when it was
    /// recorded.
    pub creation_date: Date,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// The ID of the account that holds the transaction.
    pub account_id: AccountId,
}

impl Transaction {
    /// Describe a new transaction to be inserted with [create_transaction].
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(
        transaction_type: TransactionType,
        description: &str,
        value: f64,
        creation_date: Date,
        category_id: CategoryId,
        account_id: AccountId,
    ) -> NewTransaction {
        NewTransaction {
            transaction_type,
            description: description.to_owned(),
            value,
            creation_date,
            category_id,
            account_id,
        }
    }
}

/// The fields of a transaction that has not been stored yet.
///
/// # Examples
///
/// ```
/// use mypocket::{StoreLocation, Transaction, TransactionDao, TransactionType};
/// use time::macros::date;
///
/// let mut dao = TransactionDao::new(StoreLocation::InMemory);
/// dao.open().unwrap();
///
/// let coffee = dao
///     .create_transaction(Transaction::build(
///         TransactionType::Expense,
///         "Coffee",
///         4.50,
///         date!(2015 - 04 - 16),
///         2,
///         1,
///     ))
///     .unwrap();
///
/// assert!(coffee.id > 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the transaction is an expense or income.
    pub transaction_type: TransactionType,
    /// A human-readable description, e.g. `"Coffee"` or `"Salary - April"`.
    pub description: String,
    /// The amount of money. Must not be negative, the direction of the money
    /// is given by `transaction_type`.
    pub value: f64,
    /// The date the transaction occurred.
    pub creation_date: Date,
    /// The category of the transaction. Not checked against any category table.
    pub category_id: CategoryId,
    /// The account of the transaction. Not checked against any account table.
    pub account_id: AccountId,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert a new transaction and read it back by its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeValue] if the value is negative or NaN,
/// - or [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let value = new_transaction.value;
    if value.is_nan() || value < 0.0 {
        return Err(Error::NegativeValue(value));
    }

    connection.execute(
        "INSERT INTO \"transaction\" (type, description, value, creation_date, category_id, account_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            new_transaction.transaction_type,
            new_transaction.description,
            value,
            new_transaction.creation_date,
            new_transaction.category_id,
            new_transaction.account_id,
        ),
    )?;

    let id = connection.last_insert_rowid();
    tracing::info!("Transaction created with id: {id}");

    get_transaction(id, connection)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, type, description, value, creation_date, category_id, account_id
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction in the database.
///
/// The order is whatever the database returns, callers should sort the result
/// if they need a specific order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error,
/// including a row whose type column does not map to a [TransactionType].
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, type, description, value, creation_date, category_id, account_id
             FROM \"transaction\"",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Delete the transaction with `id`, returning the number of deleted rows.
///
/// Deleting an ID that does not exist is not an error and returns `0`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<usize, Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        tracing::debug!("No transaction with id {id} to delete");
    } else {
        tracing::info!("Transaction deleted with id: {id}");
    }

    Ok(rows_affected)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// Category and account IDs are plain integers without foreign keys, those
/// tables are owned elsewhere.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type INTEGER NOT NULL,
                description TEXT NOT NULL,
                value REAL NOT NULL,
                creation_date TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                account_id INTEGER NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let transaction_type = row.get(1)?;
    let description = row.get(2)?;
    let value = row.get(3)?;
    let creation_date = row.get(4)?;
    let category_id = row.get(5)?;
    let account_id = row.get(6)?;

    Ok(Transaction {
        id,
        transaction_type,
        description,
        value,
        creation_date,
        category_id,
        account_id,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            NewTransaction, Transaction, TransactionType, count_transactions, create_transaction,
            delete_transaction, get_all_transactions, get_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn coffee() -> NewTransaction {
        Transaction::build(
            TransactionType::Expense,
            "Coffee",
            4.50,
            date!(2015 - 04 - 16),
            2,
            1,
        )
    }

    #[track_caller]
    fn assert_matches_input(transaction: &Transaction, want: &NewTransaction) {
        assert_eq!(transaction.transaction_type, want.transaction_type);
        assert_eq!(transaction.description, want.description);
        assert_eq!(transaction.value, want.value);
        assert_eq!(transaction.creation_date, want.creation_date);
        assert_eq!(transaction.category_id, want.category_id);
        assert_eq!(transaction.account_id, want.account_id);
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let want = coffee();

        let result = create_transaction(want.clone(), &conn);

        match result {
            Ok(transaction) => {
                assert!(transaction.id > 0, "want positive id, got {}", transaction.id);
                assert_matches_input(&transaction, &want);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_assigns_new_ids() {
        let conn = get_test_connection();

        let first = create_transaction(coffee(), &conn).unwrap();
        let second = create_transaction(coffee(), &conn).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn create_accepts_zero_value() {
        let conn = get_test_connection();
        let mut new_transaction = coffee();
        new_transaction.value = 0.0;

        let transaction = create_transaction(new_transaction, &conn).unwrap();

        assert_eq!(transaction.value, 0.0);
    }

    #[test]
    fn create_fails_on_negative_value() {
        let conn = get_test_connection();
        let mut new_transaction = coffee();
        new_transaction.value = -4.5;

        let result = create_transaction(new_transaction, &conn);

        assert_eq!(result, Err(Error::NegativeValue(-4.5)));
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn create_fails_on_nan_value() {
        let conn = get_test_connection();
        let mut new_transaction = coffee();
        new_transaction.value = f64::NAN;

        let result = create_transaction(new_transaction, &conn);

        assert!(
            matches!(result, Err(Error::NegativeValue(value)) if value.is_nan()),
            "want NegativeValue(NaN), got {result:?}"
        );
    }

    #[test]
    fn create_accepts_unknown_category_and_account() {
        let conn = get_test_connection();
        let new_transaction = Transaction::build(
            TransactionType::Income,
            "Salary",
            1200.0,
            date!(2015 - 04 - 01),
            9999,
            4242,
        );

        let transaction = create_transaction(new_transaction, &conn).unwrap();

        assert_eq!(transaction.category_id, 9999);
        assert_eq!(transaction.account_id, 4242);
    }

    #[test]
    fn create_stores_description_verbatim() {
        let conn = get_test_connection();
        let mut new_transaction = coffee();
        new_transaction.description = "Robert'); DROP TABLE \"transaction\";--".to_owned();

        let transaction = create_transaction(new_transaction.clone(), &conn).unwrap();

        assert_eq!(transaction.description, new_transaction.description);
        assert_eq!(count_transactions(&conn), Ok(1));
    }

    #[test]
    fn get_fails_on_missing_id() {
        let conn = get_test_connection();

        let result = get_transaction(42, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_all_returns_empty_list_for_empty_table() {
        let conn = get_test_connection();

        let transactions = get_all_transactions(&conn).unwrap();

        assert!(transactions.is_empty());
    }

    #[test]
    fn get_all_contains_created_transaction_once() {
        let conn = get_test_connection();
        let want = coffee();
        let created = create_transaction(want.clone(), &conn).unwrap();

        let transactions = get_all_transactions(&conn).unwrap();

        assert_eq!(transactions, vec![created.clone()]);
        assert_matches_input(&transactions[0], &want);
    }

    #[test]
    fn get_all_returns_every_transaction() {
        let conn = get_test_connection();
        let mut want = Vec::new();
        for i in 1..=5 {
            let new_transaction = Transaction::build(
                TransactionType::Income,
                &format!("Pay {i}"),
                i as f64 * 10.0,
                date!(2015 - 04 - 16),
                1,
                1,
            );
            want.push(create_transaction(new_transaction, &conn).unwrap());
        }

        let mut got = get_all_transactions(&conn).unwrap();
        got.sort_by_key(|transaction| transaction.id);

        assert_eq!(got, want);
    }

    #[test]
    fn get_all_fails_on_unknown_stored_type() {
        let conn = get_test_connection();
        conn.execute(
            "INSERT INTO \"transaction\" (type, description, value, creation_date, category_id, account_id)
             VALUES (7, 'Mystery', 1.0, '2015-04-16', 1, 1)",
            (),
        )
        .unwrap();

        let result = get_all_transactions(&conn);

        assert!(
            matches!(result, Err(Error::SqlError(_))),
            "want SqlError, got {result:?}"
        );
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let keep = create_transaction(coffee(), &conn).unwrap();
        let remove = create_transaction(coffee(), &conn).unwrap();

        let rows_affected = delete_transaction(remove.id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_all_transactions(&conn).unwrap(), vec![keep]);
        assert_eq!(get_transaction(remove.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_id_is_not_an_error() {
        let conn = get_test_connection();

        let rows_affected = delete_transaction(1337, &conn);

        assert_eq!(rows_affected, Ok(0));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let want_count = 20;
        for _ in 1..=want_count {
            create_transaction(coffee(), &conn).expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
