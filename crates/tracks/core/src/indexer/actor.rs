use crate::{BalanceOracle, PodIndexer, PodIndexerError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracks_storage::{PodStorageReader, PodStorageWriter};
use tracks_types::Batch;

/// Single writer of the pod store.
///
/// Receives one [`Batch`] per committed block and indexes the batches one at a
/// time, in arrival order.
#[derive(Debug)]
pub struct PodIndexerActor<S, O> {
    indexer: PodIndexer<S, O>,
    cancel_token: CancellationToken,
    batch_rx: mpsc::Receiver<Batch>,
}

impl<S, O> PodIndexerActor<S, O>
where
    S: PodStorageReader + PodStorageWriter,
    O: BalanceOracle,
{
    /// Creates a new [`PodIndexerActor`].
    pub const fn new(
        indexer: PodIndexer<S, O>,
        cancel_token: CancellationToken,
        batch_rx: mpsc::Receiver<Batch>,
    ) -> Self {
        Self { indexer, cancel_token, batch_rx }
    }

    /// Runs until cancelled, until every sender is dropped and the queue is drained,
    /// or until a batch fails.
    ///
    /// A failed batch stops the actor: later batches must not be indexed ahead of it.
    /// Cancellation interrupts a batch that is still waiting on the oracle.
    pub async fn start(mut self) -> Result<(), PodIndexerError> {
        loop {
            let batch = tokio::select! {
                maybe_batch = self.batch_rx.recv() => match maybe_batch {
                    Some(batch) => batch,
                    None => {
                        info!(target: "tracks_indexer", "Batch channel closed, stopping pod indexer");
                        return Ok(());
                    }
                },
                _ = self.cancel_token.cancelled() => {
                    info!(target: "tracks_indexer", "PodIndexerActor cancellation requested, stopping...");
                    return Ok(());
                }
            };

            tokio::select! {
                result = self.indexer.index_batch(&batch) => {
                    if let Err(err) = result {
                        error!(target: "tracks_indexer", %err, size = batch.size(), "Failed to index batch");
                        return Err(err);
                    }
                }
                _ = self.cancel_token.cancelled() => {
                    info!(target: "tracks_indexer", "PodIndexerActor cancelled while indexing, batch discarded");
                    return Ok(());
                }
            }
        }
    }
}
