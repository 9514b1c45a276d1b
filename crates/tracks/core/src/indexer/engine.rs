use crate::{
    BalanceOracle, IndexerConfig, MissingSenderPolicy, PodIndexerError,
    extractor::{ExtractedTx, extract},
    metrics::Metrics,
};
use alloy_primitives::Bytes;
use std::{sync::Arc, time::Instant};
use tracing::{debug, info, warn};
use tracks_storage::{CounterKey, PodPage, PodStorageReader, PodStorageWriter, PodWriter};
use tracks_types::{Batch, TransactionRecord, TxResult};

/// Counters of the pod log as committed by a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PodHead {
    /// Total number of records indexed so far.
    pub total_tx_count: u64,
    /// Index of the pod currently being filled.
    pub current_pod_index: u64,
}

/// Outcome of one [`PodIndexer::index_batch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSummary {
    /// Records appended to pods.
    pub indexed: usize,
    /// Batch slots that produced no record.
    pub skipped: usize,
    /// Counters written by the batch. `None` if the batch wrote nothing, in which
    /// case the store was not touched.
    pub head: Option<PodHead>,
}

/// A matched transaction whose balances have been fetched, waiting for its nonce.
#[derive(Debug)]
struct PendingRecord {
    tx: ExtractedTx,
    from_balance: String,
    to_balance: String,
}

impl PendingRecord {
    fn into_record(self, nonce: u64) -> TransactionRecord {
        let Self { tx, from_balance, to_balance } = self;
        TransactionRecord {
            from: tx.sender,
            to: tx.recipient,
            from_cosmos: tx.sender_cosmos,
            to_cosmos: tx.recipient_cosmos,
            amount: tx.amount,
            gas: tx.gas,
            tx_hash: tx.tx_hash,
            eth_tx_hash: tx.eth_tx_hash,
            nonce: nonce.to_string(),
            from_balance,
            to_balance,
        }
    }
}

/// The pod indexing engine.
///
/// Turns each committed [`Batch`] into [`TransactionRecord`]s and appends them to
/// fixed-capacity pods. Indexing a batch runs in two phases:
/// 1. every slot is matched and enriched with the sender and recipient balances at
///    the previous height. No store handle is held while the oracle is queried.
/// 2. nonces, pages and counters are written through a single store write handle,
///    which commits only if the whole batch succeeded.
///
/// Dropping the future returned by [`Self::index_batch`] before it completes leaves
/// the store untouched.
#[derive(Debug)]
pub struct PodIndexer<S, O> {
    store: Arc<S>,
    oracle: O,
    config: IndexerConfig,
}

impl<S, O> PodIndexer<S, O>
where
    S: PodStorageReader + PodStorageWriter,
    O: BalanceOracle,
{
    /// Creates a new [`PodIndexer`].
    pub fn new(store: Arc<S>, oracle: O, config: IndexerConfig) -> Self {
        Metrics::init();
        Self { store, oracle, config }
    }

    /// Returns the indexer configuration.
    pub const fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Indexes every bridged transaction of `batch`, in slot order.
    ///
    /// On error nothing written for this batch is persisted, and the caller may
    /// submit the same batch again.
    pub async fn index_batch(&self, batch: &Batch) -> Result<IndexSummary, PodIndexerError> {
        let start = Instant::now();
        let result = self.index_batch_inner(batch).await;
        Metrics::record_index_batch(start.elapsed(), &result);
        result
    }

    async fn index_batch_inner(&self, batch: &Batch) -> Result<IndexSummary, PodIndexerError> {
        if batch.is_empty() {
            debug!(target: "tracks_indexer", "No operations in batch");
            return Ok(IndexSummary::default());
        }

        let mut pending = Vec::new();
        for (slot, entry) in batch.slots().enumerate() {
            let Some(result) = entry else {
                warn!(target: "tracks_indexer", slot, size = batch.size(), "Batch slot was never filled, skipping");
                continue;
            };
            if let Some(record) = self.enrich(result).await? {
                pending.push(record);
            }
        }

        let skipped = batch.size() - pending.len();
        if pending.is_empty() {
            debug!(target: "tracks_indexer", skipped, "No bridged transactions in batch");
            return Ok(IndexSummary { indexed: 0, skipped, head: None });
        }

        let summary = self.store.with_writer(|writer| self.append(writer, pending, skipped))?;
        info!(
            target: "tracks_indexer",
            indexed = summary.indexed,
            skipped = summary.skipped,
            head = ?summary.head,
            "Indexed batch"
        );
        Ok(summary)
    }

    /// Matches one transaction and fetches its balances.
    async fn enrich(&self, result: &TxResult) -> Result<Option<PendingRecord>, PodIndexerError> {
        let Some(tx) = extract(result.events(), &self.config.matcher) else {
            return Ok(None);
        };

        if tx.sender.is_empty() {
            match self.config.missing_sender {
                MissingSenderPolicy::Index => {
                    warn!(target: "tracks_indexer", height = result.height, index = result.index, "Bridged transaction has no EVM sender, indexing anyway");
                }
                MissingSenderPolicy::Skip => {
                    warn!(target: "tracks_indexer", height = result.height, index = result.index, "Bridged transaction has no EVM sender, skipping");
                    return Ok(None);
                }
                MissingSenderPolicy::Reject => {
                    return Err(PodIndexerError::MissingSender {
                        height: result.height,
                        index: result.index,
                    });
                }
            }
        }

        let height = previous_height(result.height);
        let from_balance = self.oracle.balance_at(&tx.sender, height).await?;
        let to_balance = self.oracle.balance_at(&tx.recipient, height).await?;
        Ok(Some(PendingRecord { tx, from_balance, to_balance }))
    }

    /// Assigns nonces to `pending` and appends the records to the pod log.
    fn append(
        &self,
        writer: &dyn PodWriter,
        pending: Vec<PendingRecord>,
        skipped: usize,
    ) -> Result<IndexSummary, PodIndexerError> {
        let capacity = self.config.pod_capacity.get();
        let mut total_tx_count = writer.get_count(CounterKey::TotalTxCount)?;
        let mut pod_index = writer.get_count(CounterKey::PodCount)?;
        let mut page = match writer.get_pod(pod_index) {
            Ok(page) => page,
            Err(err) if err.is_not_found() => PodPage::default(),
            Err(err) => return Err(err.into()),
        };
        debug!(
            target: "tracks_indexer",
            total_tx_count,
            pod_index,
            pod_len = page.len(),
            pending = pending.len(),
            "Appending records"
        );

        let indexed = pending.len();
        for record in pending {
            let nonce = writer.get_nonce(&record.tx.sender)?.saturating_add(1);
            writer.set_nonce(&record.tx.sender, nonce)?;

            let record = record.into_record(nonce);
            page.push(Bytes::from(serde_json::to_vec(&record)?));
            total_tx_count += 1;

            if page.len() >= capacity {
                writer.set_pod(pod_index, &page)?;
                pod_index += 1;
                writer.set_count(CounterKey::PodCount, pod_index)?;
                page.clear();
                debug!(target: "tracks_indexer", pod_index, "Pod filled");
            }
        }

        if !page.is_empty() {
            writer.set_pod(pod_index, &page)?;
        }
        writer.set_count(CounterKey::TotalTxCount, total_tx_count)?;

        let head = PodHead { total_tx_count, current_pod_index: pod_index };
        Ok(IndexSummary { indexed, skipped, head: Some(head) })
    }
}

/// Height at which balances are read for a transaction included at `height`.
const fn previous_height(height: i64) -> u64 {
    if height > 0 { (height - 1) as u64 } else { 0 }
}
