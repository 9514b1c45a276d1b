//! Read access to the pod log.

use std::sync::Arc;
use thiserror::Error;
use tracing::warn;
use tracks_storage::{CounterKey, PodStorageReader, StorageError};
use tracks_types::TransactionRecord;

/// Error type for [`PodQuery`].
#[derive(Debug, Error)]
pub enum PodQueryError {
    /// The store could not be read, the requested pod does not exist, or a stored
    /// counter or page could not be decoded.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A record inside a stored page is not a valid transaction record.
    #[error("malformed record {position} in pod {pod}: {source}")]
    MalformedRecord {
        /// Index of the pod.
        pod: u64,
        /// Position of the record inside the pod.
        position: usize,
        /// The decode failure.
        #[source]
        source: serde_json::Error,
    },
}

impl PodQueryError {
    /// Returns `true` if the requested pod was never written.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(err) if err.is_not_found())
    }
}

/// Read API over committed pod store state.
///
/// Readers only observe committed batches, never a batch in progress.
#[derive(Debug)]
pub struct PodQuery<R> {
    store: Arc<R>,
}

impl<R> Clone for PodQuery<R> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone() }
    }
}

impl<R: PodStorageReader> PodQuery<R> {
    /// Creates a new [`PodQuery`] over `store`.
    pub const fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    /// Returns the index of the pod currently being filled. Every pod below it is full.
    pub fn pod_count(&self) -> Result<u64, PodQueryError> {
        Ok(self.store.get_count(CounterKey::PodCount)?)
    }

    /// Returns the total number of indexed transaction records.
    pub fn tx_count(&self) -> Result<u64, PodQueryError> {
        Ok(self.store.get_count(CounterKey::TotalTxCount)?)
    }

    /// Returns the records of pod `index`, in indexing order.
    pub fn pod_txs(&self, index: u64) -> Result<Vec<TransactionRecord>, PodQueryError> {
        let page = self.store.get_pod(index)?;
        page.records
            .iter()
            .enumerate()
            .map(|(position, raw)| {
                serde_json::from_slice(raw).map_err(|source| {
                    warn!(target: "tracks_rpc", pod = index, position, %source, "Malformed record in pod");
                    PodQueryError::MalformedRecord { pod: index, position, source }
                })
            })
            .collect()
    }
}
