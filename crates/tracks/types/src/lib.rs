//! Core types shared across the tracks pod indexer.
//!
//! This crate defines the input side (committed transaction results and the
//! per-block [`Batch`]) and the output side ([`TransactionRecord`]) of the
//! pod indexing pipeline.
mod event;
pub use event::{Batch, BatchError, Event, EventAttribute, ExecTxResult, TxResult};

mod record;
pub use record::{NumericFieldError, TransactionRecord};
