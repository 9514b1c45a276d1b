//! Core logic of the tracks pod indexer.
//!
//! Committed blocks arrive as [`tracks_types::Batch`]es. The [`PodIndexer`] picks out
//! the bridged EVM transactions, enriches them with balances from a
//! [`BalanceOracle`] and an indexer-local nonce, and appends them to fixed-capacity
//! pods in the pod store. [`PodQuery`] and [`TracksRpc`] serve the stored pods.

mod config;
pub use config::{DEFAULT_POD_CAPACITY, EventMatcher, IndexerConfig, MissingSenderPolicy};

pub mod extractor;

mod oracle;
#[cfg(test)]
pub use oracle::MockBalanceOracle;
pub use oracle::{
    AlloyBalanceOracle, BalanceOracle, BalanceOracleError, DEFAULT_RETRY_DELAY, RetryPolicy,
    RetryingBalanceOracle,
};

mod indexer;
pub use indexer::{IndexSummary, PodHead, PodIndexer, PodIndexerActor, PodIndexerError};

mod query;
pub use query::{PodQuery, PodQueryError};

mod reconcile;
pub use reconcile::{ReconcileError, ReconcileReport, reconcile};

mod rpc;
pub use rpc::TracksRpc;

mod metrics;

#[cfg(test)]
mod test_utils;
