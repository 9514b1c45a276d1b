//! Provider for pod page database operations.

use crate::{
    error::StorageError,
    models::{PodPage, Pods},
};
use reth_db_api::transaction::{DbTx, DbTxMut};
use tracing::{debug, error};

/// Provides access to pod pages within a transaction.
#[derive(Debug)]
pub(crate) struct PodProvider<'tx, TX> {
    tx: &'tx TX,
}

impl<'tx, TX> PodProvider<'tx, TX> {
    pub(crate) const fn new(tx: &'tx TX) -> Self {
        Self { tx }
    }
}

impl<TX> PodProvider<'_, TX>
where
    TX: DbTx,
{
    /// Gets the [`PodPage`] stored at `index`.
    pub(crate) fn get_pod(&self, index: u64) -> Result<PodPage, StorageError> {
        let page = self.tx.get::<Pods>(index).inspect_err(|err| {
            error!(
                target: "tracks_storage",
                pod_index = index,
                ?err,
                "Failed to read pod"
            );
        })?;

        page.ok_or_else(|| {
            debug!(target: "tracks_storage", pod_index = index, "Pod not found");
            StorageError::EntryNotFound(format!("pod {index} not found"))
        })
    }
}

impl<TX> PodProvider<'_, TX>
where
    TX: DbTxMut,
{
    /// Overwrites the [`PodPage`] stored at `index`.
    pub(crate) fn set_pod(&self, index: u64, page: &PodPage) -> Result<(), StorageError> {
        debug!(target: "tracks_storage", pod_index = index, records = page.len(), "Storing pod");
        self.tx.put::<Pods>(index, page.clone()).inspect_err(|err| {
            error!(
                target: "tracks_storage",
                pod_index = index,
                ?err,
                "Failed to store pod"
            );
        })?;
        Ok(())
    }
}
