//! Models for the scalar counters kept next to the pods.
//!
//! Counter values are stored as decimal text. A stored value that is not a
//! decimal `u64` is a decode error and is never silently defaulted.

use bytes::BufMut;
use reth_db_api::{
    DatabaseError,
    table::{Compress, Decode, Decompress, Encode, Table},
};
use serde::{Deserialize, Serialize};

/// Key of a scalar counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CounterKey {
    /// Total number of transaction records ever indexed.
    TotalTxCount,
    /// Index of the current (partially filled) pod.
    PodCount,
}

impl CounterKey {
    /// Returns the on-disk name of the counter.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TotalTxCount => "countTxs",
            Self::PodCount => "countPods",
        }
    }
}

impl Encode for CounterKey {
    type Encoded = Vec<u8>;

    fn encode(self) -> Self::Encoded {
        self.as_str().as_bytes().to_vec()
    }
}

impl Decode for CounterKey {
    fn decode(value: &[u8]) -> Result<Self, DatabaseError> {
        match value {
            b"countTxs" => Ok(Self::TotalTxCount),
            b"countPods" => Ok(Self::PodCount),
            _ => Err(DatabaseError::Decode),
        }
    }
}

/// An unsigned integer stored as decimal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextCount(pub u64);

impl From<u64> for TextCount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<TextCount> for u64 {
    fn from(value: TextCount) -> Self {
        value.0
    }
}

impl Compress for TextCount {
    type Compressed = Vec<u8>;

    fn compress_to_buf<B: BufMut + AsMut<[u8]>>(&self, buf: &mut B) {
        buf.put_slice(self.0.to_string().as_bytes());
    }
}

impl Decompress for TextCount {
    fn decompress(value: &[u8]) -> Result<Self, DatabaseError> {
        let text = std::str::from_utf8(value).map_err(|_| DatabaseError::Decode)?;
        text.parse::<u64>().map(Self).map_err(|_| DatabaseError::Decode)
    }
}

/// A table for the scalar counters.
///
/// - **Key**: [`CounterKey`]
/// - **Value**: [`TextCount`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Counters;

impl Table for Counters {
    const NAME: &'static str = "counters";

    const DUPSORT: bool = false;

    type Key = CounterKey;

    type Value = TextCount;
}
