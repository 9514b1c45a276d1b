use crate::{
    StorageError,
    models::{CounterKey, PodPage},
};

/// Mutable view of the pod store inside one write transaction.
///
/// Handed out by [`PodStorageWriter::with_writer`]. Reads observe the writes
/// already issued through the same handle.
pub trait PodWriter {
    /// Gets the page stored at `index`.
    ///
    /// # Returns
    /// * `Ok(PodPage)` if the pod exists.
    /// * `Err(StorageError::EntryNotFound)` if no pod was ever written at `index`.
    fn get_pod(&self, index: u64) -> Result<PodPage, StorageError>;

    /// Overwrites the page stored at `index`.
    fn set_pod(&self, index: u64, page: &PodPage) -> Result<(), StorageError>;

    /// Gets a counter value. An absent counter reads as `0`.
    fn get_count(&self, key: CounterKey) -> Result<u64, StorageError>;

    /// Overwrites a counter value.
    fn set_count(&self, key: CounterKey, value: u64) -> Result<(), StorageError>;

    /// Gets the last nonce issued to `address`. An absent entry reads as `0`.
    fn get_nonce(&self, address: &str) -> Result<u64, StorageError>;

    /// Overwrites the last nonce issued to `address`.
    fn set_nonce(&self, address: &str, nonce: u64) -> Result<(), StorageError>;
}

/// Provides scoped write access to the pod store.
///
/// Implementations are expected to apply every mutation issued through the
/// handle atomically: either all of them become visible or none do.
pub trait PodStorageWriter {
    /// Runs `f` against a fresh write handle.
    ///
    /// The handle is committed when `f` returns `Ok` and discarded on every
    /// other exit path, including a failed commit.
    fn with_writer<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn PodWriter) -> Result<T, E>,
        E: From<StorageError>;
}

/// Provides read access to committed pod store state.
pub trait PodStorageReader {
    /// Gets the page stored at `index`.
    ///
    /// # Returns
    /// * `Ok(PodPage)` if the pod exists.
    /// * `Err(StorageError::EntryNotFound)` if no pod was ever written at `index`.
    fn get_pod(&self, index: u64) -> Result<PodPage, StorageError>;

    /// Gets a counter value. An absent counter reads as `0`.
    fn get_count(&self, key: CounterKey) -> Result<u64, StorageError>;

    /// Gets the last nonce issued to `address`. An absent entry reads as `0`.
    fn get_nonce(&self, address: &str) -> Result<u64, StorageError>;

    /// Returns every nonce ledger entry, ordered by address.
    fn nonces(&self) -> Result<Vec<(String, u64)>, StorageError>;
}
