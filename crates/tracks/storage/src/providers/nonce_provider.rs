//! Provider for the nonce ledger.
use crate::{
    StorageError,
    models::{AccountKey, Nonces},
};
use reth_db_api::{
    cursor::DbCursorRO,
    transaction::{DbTx, DbTxMut},
};
use tracing::error;

/// A nonce ledger storage that wraps a transactional reference.
#[derive(Debug)]
pub(crate) struct NonceProvider<'tx, TX> {
    tx: &'tx TX,
}

impl<'tx, TX> NonceProvider<'tx, TX> {
    pub(crate) const fn new(tx: &'tx TX) -> Self {
        Self { tx }
    }
}

impl<TX> NonceProvider<'_, TX>
where
    TX: DbTx,
{
    /// Gets the last nonce issued to `address`, `0` if none was issued yet.
    pub(crate) fn get_nonce(&self, address: &str) -> Result<u64, StorageError> {
        let nonce = self.tx.get::<Nonces>(AccountKey::from(address)).inspect_err(|err| {
            error!(target: "tracks_storage", address, ?err, "Failed to read nonce");
        })?;
        Ok(nonce.map(u64::from).unwrap_or_default())
    }

    /// Walks the whole ledger in key order.
    pub(crate) fn nonces(&self) -> Result<Vec<(String, u64)>, StorageError> {
        let mut cursor = self.tx.cursor_read::<Nonces>().inspect_err(|err| {
            error!(target: "tracks_storage", ?err, "Failed to get cursor for Nonces");
        })?;

        let walker = cursor.walk(None).inspect_err(|err| {
            error!(target: "tracks_storage", ?err, "Failed to walk nonce ledger");
        })?;

        let mut entries = Vec::new();
        for row in walker {
            let (AccountKey(address), nonce) = row.inspect_err(|err| {
                error!(target: "tracks_storage", ?err, "Failed to read nonce ledger entry");
            })?;
            entries.push((address, nonce.into()));
        }
        Ok(entries)
    }
}

impl<TX> NonceProvider<'_, TX>
where
    TX: DbTxMut,
{
    pub(crate) fn set_nonce(&self, address: &str, nonce: u64) -> Result<(), StorageError> {
        self.tx.put::<Nonces>(AccountKey::from(address), nonce.into()).inspect_err(|err| {
            error!(target: "tracks_storage", address, nonce, ?err, "Failed to store nonce");
        })?;
        Ok(())
    }
}
