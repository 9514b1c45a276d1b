use reth_db::DatabaseError;
use thiserror::Error;

/// Errors that may occur while interacting with the pod store.
///
/// This enum is used across all implementations of the storage traits.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to open or create the database environment.
    #[error("failed to initialise database: {0}")]
    DatabaseInit(eyre::Report),

    /// Read, write, commit or decode failure reported by the database.
    ///
    /// A malformed stored value surfaces here as [`DatabaseError::Decode`].
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// The expected entry was not found in the database.
    #[error("Entry not found: {0}")]
    EntryNotFound(String),
}

impl StorageError {
    /// Returns `true` if the error reports a missing entry.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::EntryNotFound(_))
    }

    /// Returns `true` if the error reports a value that could not be decoded.
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Database(DatabaseError::Decode))
    }
}
