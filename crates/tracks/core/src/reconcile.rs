//! Consistency check of the pod store.
//!
//! Verifies that the counters and the nonce ledger agree with the pod contents:
//! - every pod below the current pod index is full, the current pod is partial
//!   and no pod exists past it,
//! - the total record count equals the number of stored records,
//! - every sender's ledger entry equals its number of records, and the records
//!   of a sender carry the nonces `1..=n` in order.

use crate::{PodQuery, PodQueryError};
use std::{collections::BTreeMap, num::NonZeroUsize, sync::Arc};
use thiserror::Error;
use tracing::{debug, info};
use tracks_storage::PodStorageReader;
use tracks_types::NumericFieldError;

/// Error type for [`reconcile`].
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The store could not be read.
    #[error(transparent)]
    Query(#[from] PodQueryError),

    /// A stored record carries a nonce that is not a decimal number.
    #[error("record {position} in pod {pod} has an invalid nonce: {source}")]
    InvalidNonce {
        /// Index of the pod.
        pod: u64,
        /// Position of the record inside the pod.
        position: usize,
        /// The parse failure.
        #[source]
        source: NumericFieldError,
    },

    /// The counters or the nonce ledger disagree with the pod contents.
    #[error("pod store is inconsistent: {0}")]
    Inconsistent(String),
}

/// Result of a successful [`reconcile`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Index of the pod currently being filled.
    pub current_pod_index: u64,
    /// Number of records stored across all pods.
    pub total_tx_count: u64,
    /// Number of distinct senders in the nonce ledger.
    pub senders: usize,
}

/// Checks the pod store against the invariants maintained by the indexer.
pub fn reconcile<R: PodStorageReader>(
    store: Arc<R>,
    pod_capacity: NonZeroUsize,
) -> Result<ReconcileReport, ReconcileError> {
    let query = PodQuery::new(store.clone());
    let capacity = pod_capacity.get();
    let current_pod_index = query.pod_count()?;
    let total_tx_count = query.tx_count()?;

    let mut stored: u64 = 0;
    let mut issued: BTreeMap<String, u64> = BTreeMap::new();
    for pod in 0..=current_pod_index {
        let records = match query.pod_txs(pod) {
            Ok(records) => records,
            Err(err) if err.is_not_found() && pod == current_pod_index => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        if pod < current_pod_index && records.len() != capacity {
            return Err(ReconcileError::Inconsistent(format!(
                "pod {pod} holds {} records, expected {capacity}",
                records.len()
            )));
        }
        if pod == current_pod_index && records.len() >= capacity {
            return Err(ReconcileError::Inconsistent(format!(
                "current pod {pod} holds {} records, expected fewer than {capacity}",
                records.len()
            )));
        }

        for (position, record) in records.iter().enumerate() {
            let nonce = record
                .nonce_value()
                .map_err(|source| ReconcileError::InvalidNonce { pod, position, source })?;
            let last = issued.entry(record.from.clone()).or_default();
            if nonce != *last + 1 {
                return Err(ReconcileError::Inconsistent(format!(
                    "record {position} in pod {pod} has nonce {nonce} for sender {:?}, expected {}",
                    record.from,
                    *last + 1
                )));
            }
            *last = nonce;
        }
        stored += records.len() as u64;
    }

    match store.get_pod(current_pod_index + 1) {
        Err(err) if err.is_not_found() => {}
        Err(err) => return Err(PodQueryError::from(err).into()),
        Ok(_) => {
            return Err(ReconcileError::Inconsistent(format!(
                "pod {} exists past the current pod {current_pod_index}",
                current_pod_index + 1
            )));
        }
    }

    if stored != total_tx_count {
        return Err(ReconcileError::Inconsistent(format!(
            "total tx count is {total_tx_count} but pods hold {stored} records"
        )));
    }

    let ledger: BTreeMap<String, u64> =
        store.nonces().map_err(PodQueryError::from)?.into_iter().collect();
    for (sender, nonce) in &ledger {
        let expected = issued.get(sender).copied().unwrap_or_default();
        if *nonce != expected {
            return Err(ReconcileError::Inconsistent(format!(
                "nonce ledger has {nonce} for sender {sender:?}, pods hold {expected} records"
            )));
        }
        debug!(target: "tracks_indexer", %sender, nonce, "Nonce ledger entry verified");
    }
    if let Some(sender) = issued.keys().find(|sender| !ledger.contains_key(*sender)) {
        return Err(ReconcileError::Inconsistent(format!(
            "sender {sender:?} has records but no nonce ledger entry"
        )));
    }

    let report = ReconcileReport { current_pod_index, total_tx_count, senders: ledger.len() };
    info!(
        target: "tracks_indexer",
        current_pod_index,
        total_tx_count,
        senders = report.senders,
        "Pod store is consistent"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DEFAULT_POD_CAPACITY, IndexerConfig, PodIndexer,
        test_utils::{StaticOracle, bridged_tx, setup_db},
    };
    use alloy_primitives::Bytes;
    use tracks_storage::{CounterKey, PodDb, PodPage, PodStorageWriter, StorageError};
    use tracks_types::Batch;

    const CAPACITY: NonZeroUsize = match NonZeroUsize::new(2) {
        Some(capacity) => capacity,
        None => unreachable!(),
    };

    async fn indexed_store() -> (tempfile::TempDir, Arc<PodDb>) {
        let (dir, store) = setup_db();
        let indexer = PodIndexer::new(
            store.clone(),
            StaticOracle::default(),
            IndexerConfig::with_pod_capacity(CAPACITY),
        );
        let batch: Batch = [
            bridged_tx(1, 0, "0xaa", "0xbb"),
            bridged_tx(1, 1, "0xcc", "0xbb"),
            bridged_tx(1, 2, "0xaa", "0xbb"),
        ]
        .into_iter()
        .collect();
        indexer.index_batch(&batch).await.unwrap();
        (dir, store)
    }

    #[test]
    fn test_empty_store_is_consistent() {
        let (_dir, store) = setup_db();
        assert_eq!(reconcile(store, CAPACITY).unwrap(), ReconcileReport::default());
    }

    #[tokio::test]
    async fn test_indexed_store_is_consistent() {
        let (_dir, store) = indexed_store().await;
        let report = reconcile(store, CAPACITY).unwrap();
        assert_eq!(
            report,
            ReconcileReport { current_pod_index: 1, total_tx_count: 3, senders: 2 }
        );
    }

    #[tokio::test]
    async fn test_many_senders_are_consistent() {
        let (_dir, store) = setup_db();
        let indexer = PodIndexer::new(
            store.clone(),
            StaticOracle::default(),
            IndexerConfig::with_pod_capacity(DEFAULT_POD_CAPACITY),
        );
        for height in 1..=5 {
            let batch: Batch = (0..1000)
                .map(|index| bridged_tx(height, index, &format!("0x{index:040x}"), "0xbb"))
                .collect();
            indexer.index_batch(&batch).await.unwrap();
        }

        let report = reconcile(store, DEFAULT_POD_CAPACITY).unwrap();
        assert_eq!(
            report,
            ReconcileReport { current_pod_index: 200, total_tx_count: 5000, senders: 1000 }
        );
    }

    #[tokio::test]
    async fn test_tampered_counter_is_rejected() {
        let (_dir, store) = indexed_store().await;
        store
            .with_writer(|writer| writer.set_count(CounterKey::TotalTxCount, 4))
            .unwrap();
        assert!(matches!(reconcile(store, CAPACITY), Err(ReconcileError::Inconsistent(_))));
    }

    #[tokio::test]
    async fn test_tampered_nonce_is_rejected() {
        let (_dir, store) = indexed_store().await;
        store.with_writer(|writer| writer.set_nonce("0xaa", 5)).unwrap();
        assert!(matches!(reconcile(store, CAPACITY), Err(ReconcileError::Inconsistent(_))));
    }

    #[tokio::test]
    async fn test_stray_nonce_is_rejected() {
        let (_dir, store) = indexed_store().await;
        store.with_writer(|writer| writer.set_nonce("0xee", 1)).unwrap();
        assert!(matches!(reconcile(store, CAPACITY), Err(ReconcileError::Inconsistent(_))));
    }

    #[tokio::test]
    async fn test_pod_past_current_is_rejected() {
        let (_dir, store) = indexed_store().await;
        store
            .with_writer(|writer| {
                writer.set_pod(2, &PodPage::from(vec![Bytes::from_static(b"{}")]))?;
                Ok::<_, StorageError>(())
            })
            .unwrap();
        assert!(matches!(reconcile(store, CAPACITY), Err(ReconcileError::Inconsistent(_))));
    }

    #[tokio::test]
    async fn test_capacity_change_is_rejected() {
        let (_dir, store) = indexed_store().await;
        let larger = NonZeroUsize::new(3).unwrap();
        assert!(matches!(reconcile(store, larger), Err(ReconcileError::Inconsistent(_))));
    }
}
