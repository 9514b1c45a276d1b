use crate::BalanceOracleError;
use thiserror::Error;
use tracks_storage::StorageError;

/// Error type for the [`crate::PodIndexer`].
///
/// Any of these aborts the current batch. Nothing written during the batch is kept.
#[derive(Debug, Error)]
pub enum PodIndexerError {
    /// Reading or writing the pod store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A balance query failed.
    #[error(transparent)]
    Oracle(#[from] BalanceOracleError),

    /// A transaction record could not be serialized.
    #[error("failed to serialize transaction record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A bridged transaction carried no EVM sender under
    /// [`crate::MissingSenderPolicy::Reject`].
    #[error("bridged transaction {index} at height {height} has no EVM sender")]
    MissingSender {
        /// Height of the block containing the transaction.
        height: i64,
        /// Position of the transaction within its block.
        index: u32,
    },
}
