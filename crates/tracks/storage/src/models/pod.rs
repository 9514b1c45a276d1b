//! Models for storing pod pages in the database.
//!
//! A pod is a fixed-capacity page of serialized transaction records. Pages are
//! keyed by pod index and always rewritten as a whole; the page at the current
//! pod index is the only one that is ever overwritten.

use alloy_primitives::Bytes;
use reth_db_api::table::Table;
use serde::{Deserialize, Serialize};

/// An ordered page of serialized transaction records.
///
/// This is the outer envelope stored in the [`Pods`] table: a JSON array whose
/// entries are the serialized records themselves. Decoding the records is left
/// to the reader, so the store never depends on the record schema.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PodPage {
    /// Serialized records, in indexing order.
    pub records: Vec<Bytes>,
}

impl PodPage {
    /// Returns the number of records in the page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the page holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a serialized record to the page.
    pub fn push(&mut self, record: impl Into<Bytes>) {
        self.records.push(record.into());
    }

    /// Removes every record from the page.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl From<Vec<Bytes>> for PodPage {
    fn from(records: Vec<Bytes>) -> Self {
        Self { records }
    }
}

/// A table for storing pod pages by pod index.
///
/// This is a standard table (not dup-sorted) where:
/// - **Key**: `u64` — pod index
/// - **Value**: [`PodPage`] — the serialized records of the pod
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Pods;

impl Table for Pods {
    const NAME: &'static str = "pods";

    const DUPSORT: bool = false;

    type Key = u64;

    type Value = PodPage;
}
