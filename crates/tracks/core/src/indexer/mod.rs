//! Projection of committed batches into pods.

mod error;
pub use error::PodIndexerError;

mod engine;
pub use engine::{IndexSummary, PodHead, PodIndexer};

mod actor;
pub use actor::PodIndexerActor;
