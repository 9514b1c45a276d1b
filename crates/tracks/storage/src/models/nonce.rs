//! Models for the indexer-local nonce ledger.
//!
//! The ledger maps a sender address, exactly as it appeared in the source
//! events, to the last nonce the indexer issued for it. Keys carry a fixed
//! prefix so that an empty sender still encodes to a non-empty database key.

use super::TextCount;
use reth_db_api::{
    DatabaseError,
    table::{Decode, Encode, Table},
};
use serde::{Deserialize, Serialize};

const ACCOUNT_KEY_PREFIX: &[u8] = b"nonce:";

/// Sender address text used as the nonce ledger key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AccountKey(pub String);

impl From<&str> for AccountKey {
    fn from(address: &str) -> Self {
        Self(address.to_string())
    }
}

impl Encode for AccountKey {
    type Encoded = Vec<u8>;

    fn encode(self) -> Self::Encoded {
        let mut encoded = Vec::with_capacity(ACCOUNT_KEY_PREFIX.len() + self.0.len());
        encoded.extend_from_slice(ACCOUNT_KEY_PREFIX);
        encoded.extend_from_slice(self.0.as_bytes());
        encoded
    }
}

impl Decode for AccountKey {
    fn decode(value: &[u8]) -> Result<Self, DatabaseError> {
        let address = value.strip_prefix(ACCOUNT_KEY_PREFIX).ok_or(DatabaseError::Decode)?;
        String::from_utf8(address.to_vec()).map(Self).map_err(|_| DatabaseError::Decode)
    }
}

/// A table for the nonce ledger.
///
/// - **Key**: [`AccountKey`] — sender address
/// - **Value**: [`TextCount`] — last issued nonce
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Nonces;

impl Table for Nonces {
    const NAME: &'static str = "nonces";

    const DUPSORT: bool = false;

    type Key = AccountKey;

    type Value = TextCount;
}
