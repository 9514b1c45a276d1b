//! MDBX-backed storage for the tracks pod indexer.
//!
//! Holds three tables:
//! - `pods`: fixed-capacity pages of serialized transaction records, keyed by pod index,
//! - `counters`: the total indexed record count and the current pod index,
//! - `nonces`: the indexer-local nonce ledger, keyed by sender address.
//!
//! All writes of one indexing pass go through a single scoped write transaction
//! (see [`PodStorageWriter::with_writer`]).

mod error;
pub use error::StorageError;

mod models;
pub use models::{AccountKey, CounterKey, Counters, Nonces, PodPage, Pods, TextCount};

mod providers;

mod poddb;
pub use poddb::PodDb;

mod traits;
pub use traits::{PodStorageReader, PodStorageWriter, PodWriter};
