//! Committed transaction results as delivered by the commit pipeline.

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A key/value pair carried by an application-level execution event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    /// The attribute key.
    pub key: String,
    /// The attribute value.
    pub value: String,
    /// Whether the node indexes this attribute for event queries.
    #[serde(default)]
    pub index: bool,
}

impl EventAttribute {
    /// Creates a new non-indexed [`EventAttribute`].
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into(), index: false }
    }
}

/// An execution event: a type tag plus an ordered list of attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The event type, e.g. `message` or `transfer`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The event attributes, in emission order.
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

impl Event {
    /// Creates a new [`Event`] from a type tag and `(key, value)` pairs.
    pub fn new<K, V>(kind: impl Into<String>, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            kind: kind.into(),
            attributes: attributes.into_iter().map(|(k, v)| EventAttribute::new(k, v)).collect(),
        }
    }

    /// Returns the value of the first attribute with the given key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|attr| attr.key == key).map(|attr| attr.value.as_str())
    }
}

/// The execution outcome of a single transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecTxResult {
    /// The events emitted while executing the transaction.
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A committed transaction together with its execution result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    /// Height of the block containing the transaction.
    pub height: i64,
    /// Position of the transaction within its block.
    pub index: u32,
    /// Raw transaction bytes.
    #[serde(default)]
    pub tx: Bytes,
    /// Execution outcome.
    #[serde(default)]
    pub result: ExecTxResult,
}

impl TxResult {
    /// Returns the events emitted by this transaction.
    pub fn events(&self) -> &[Event] {
        &self.result.events
    }
}

/// Errors raised while assembling a [`Batch`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    /// The result's in-block index does not address a slot of the batch.
    #[error("tx index {index} out of range for batch of size {size}")]
    IndexOutOfRange {
        /// The offending in-block index.
        index: u32,
        /// The batch size.
        size: usize,
    },
}

/// One block's worth of transaction results, addressed by in-block index.
///
/// The commit pipeline creates the batch with one slot per transaction and fills
/// it with [`Batch::add`]. The batch is handed to the indexer once and must not be
/// modified after indexing has started.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Result slots, indexed by [`TxResult::index`].
    pub ops: Vec<Option<TxResult>>,
}

impl Batch {
    /// Creates a new [`Batch`] with `size` empty slots.
    pub fn new(size: usize) -> Self {
        Self { ops: vec![None; size] }
    }

    /// Adds or replaces the entry for `result.index`.
    pub fn add(&mut self, result: TxResult) -> Result<(), BatchError> {
        let size = self.ops.len();
        let slot = self
            .ops
            .get_mut(result.index as usize)
            .ok_or(BatchError::IndexOutOfRange { index: result.index, size })?;
        *slot = Some(result);
        Ok(())
    }

    /// Returns the total number of slots inside the batch.
    pub fn size(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if the batch has no slots.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterates over the slots in in-block order.
    pub fn slots(&self) -> impl Iterator<Item = Option<&TxResult>> {
        self.ops.iter().map(Option::as_ref)
    }
}

impl FromIterator<TxResult> for Batch {
    /// Builds a dense batch whose slots follow iteration order.
    fn from_iter<I: IntoIterator<Item = TxResult>>(iter: I) -> Self {
        Self { ops: iter.into_iter().map(Some).collect() }
    }
}
