//! Main database access structure and transaction contexts.

use crate::{
    error::StorageError,
    models::{CounterKey, PodPage, Tables},
    providers::{CounterProvider, NonceProvider, PodProvider},
    traits::{PodStorageReader, PodStorageWriter, PodWriter},
};
use reth_db::{
    DatabaseEnv,
    mdbx::{DatabaseArguments, init_db_for},
};
use reth_db_api::{
    database::Database,
    transaction::{DbTx, DbTxMut},
};
use std::path::Path;
use tracing::{debug, error};

/// Manages the database environment holding the pods, counters and nonce ledger.
/// Provides transactional access to data via providers.
#[derive(Debug)]
pub struct PodDb {
    env: DatabaseEnv,
}

impl PodDb {
    /// Creates or opens a database environment at the given path.
    pub fn new(path: &Path) -> Result<Self, StorageError> {
        let env = init_db_for::<_, Tables>(path, DatabaseArguments::default())
            .map_err(StorageError::DatabaseInit)?;
        debug!(target: "tracks_storage", path = %path.display(), "Opened pod database");
        Ok(Self { env })
    }
}

impl PodStorageReader for PodDb {
    fn get_pod(&self, index: u64) -> Result<PodPage, StorageError> {
        self.env.view(|tx| PodProvider::new(tx).get_pod(index))?
    }

    fn get_count(&self, key: CounterKey) -> Result<u64, StorageError> {
        self.env.view(|tx| CounterProvider::new(tx).get_count(key))?
    }

    fn get_nonce(&self, address: &str) -> Result<u64, StorageError> {
        self.env.view(|tx| NonceProvider::new(tx).get_nonce(address))?
    }

    fn nonces(&self) -> Result<Vec<(String, u64)>, StorageError> {
        self.env.view(|tx| NonceProvider::new(tx).nonces())?
    }
}

impl PodStorageWriter for PodDb {
    fn with_writer<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn PodWriter) -> Result<T, E>,
        E: From<StorageError>,
    {
        let tx = self.env.tx_mut().map_err(StorageError::from)?;
        let result = f(&MdbxPodWriter::new(&tx));

        match result {
            Ok(value) => {
                tx.commit().map_err(|err| {
                    error!(target: "tracks_storage", ?err, "Failed to commit pod write transaction");
                    StorageError::from(err)
                })?;
                Ok(value)
            }
            Err(err) => {
                debug!(target: "tracks_storage", "Discarding pod write transaction");
                tx.abort();
                Err(err)
            }
        }
    }
}

/// [`PodWriter`] over an MDBX read-write transaction.
#[derive(Debug)]
struct MdbxPodWriter<'tx, TX> {
    tx: &'tx TX,
}

impl<'tx, TX> MdbxPodWriter<'tx, TX> {
    const fn new(tx: &'tx TX) -> Self {
        Self { tx }
    }
}

impl<TX> PodWriter for MdbxPodWriter<'_, TX>
where
    TX: DbTx + DbTxMut,
{
    fn get_pod(&self, index: u64) -> Result<PodPage, StorageError> {
        PodProvider::new(self.tx).get_pod(index)
    }

    fn set_pod(&self, index: u64, page: &PodPage) -> Result<(), StorageError> {
        PodProvider::new(self.tx).set_pod(index, page)
    }

    fn get_count(&self, key: CounterKey) -> Result<u64, StorageError> {
        CounterProvider::new(self.tx).get_count(key)
    }

    fn set_count(&self, key: CounterKey, value: u64) -> Result<(), StorageError> {
        CounterProvider::new(self.tx).set_count(key, value)
    }

    fn get_nonce(&self, address: &str) -> Result<u64, StorageError> {
        NonceProvider::new(self.tx).get_nonce(address)
    }

    fn set_nonce(&self, address: &str, nonce: u64) -> Result<(), StorageError> {
        NonceProvider::new(self.tx).set_nonce(address, nonce)
    }
}
