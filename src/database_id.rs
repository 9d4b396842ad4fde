//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a transaction, assigned by the database.
pub type TransactionId = DatabaseId;

/// The ID of the category a transaction belongs to.
pub type CategoryId = DatabaseId;

/// The ID of the account that holds a transaction.
pub type AccountId = DatabaseId;
