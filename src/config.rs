//! Where the transaction store keeps its data.

use std::path::{Path, PathBuf};

/// The location of the SQLite database backing a [TransactionDao](crate::TransactionDao).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A database file on disk. The file is created on first open.
    File(PathBuf),
    /// A private in-memory database.
    ///
    /// Each open starts with an empty database and everything is lost on close.
    InMemory,
}

impl StoreLocation {
    /// Create a location for the database file at `path`.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

impl std::fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::InMemory => write!(f, ":memory:"),
        }
    }
}
