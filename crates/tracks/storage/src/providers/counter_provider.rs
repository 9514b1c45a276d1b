//! Provider for the scalar counters.
use crate::{
    StorageError,
    models::{CounterKey, Counters},
};
use reth_db_api::transaction::{DbTx, DbTxMut};
use tracing::error;

/// A counter storage that wraps a transactional reference.
#[derive(Debug)]
pub(crate) struct CounterProvider<'tx, TX> {
    tx: &'tx TX,
}

impl<'tx, TX> CounterProvider<'tx, TX> {
    pub(crate) const fn new(tx: &'tx TX) -> Self {
        Self { tx }
    }
}

impl<TX> CounterProvider<'_, TX>
where
    TX: DbTx,
{
    /// Reads a counter. An absent counter reads as `0`; a malformed one is an error.
    pub(crate) fn get_count(&self, key: CounterKey) -> Result<u64, StorageError> {
        let value = self.tx.get::<Counters>(key).inspect_err(|err| {
            error!(
                target: "tracks_storage",
                counter = key.as_str(),
                ?err,
                "Failed to read counter"
            );
        })?;
        Ok(value.map(u64::from).unwrap_or_default())
    }
}

impl<TX> CounterProvider<'_, TX>
where
    TX: DbTxMut,
{
    pub(crate) fn set_count(&self, key: CounterKey, value: u64) -> Result<(), StorageError> {
        self.tx.put::<Counters>(key, value.into()).inspect_err(|err| {
            error!(
                target: "tracks_storage",
                counter = key.as_str(),
                value,
                ?err,
                "Failed to store counter"
            );
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tables;
    use bytes::BufMut;
    use reth_db::{
        DatabaseEnv, DatabaseError,
        mdbx::{DatabaseArguments, init_db_for},
    };
    use reth_db_api::{
        Database,
        table::{Compress, Decompress, Table},
    };
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    /// Raw text value used to plant malformed counters.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct RawText(String);

    impl Compress for RawText {
        type Compressed = Vec<u8>;

        fn compress_to_buf<B: BufMut + AsMut<[u8]>>(&self, buf: &mut B) {
            buf.put_slice(self.0.as_bytes());
        }
    }

    impl Decompress for RawText {
        fn decompress(value: &[u8]) -> Result<Self, DatabaseError> {
            Ok(Self(String::from_utf8_lossy(value).into_owned()))
        }
    }

    /// Same on-disk table as [`Counters`], with an unchecked value type.
    #[derive(Debug, Default)]
    struct RawCounters;

    impl Table for RawCounters {
        const NAME: &'static str = Counters::NAME;
        const DUPSORT: bool = false;
        type Key = CounterKey;
        type Value = RawText;
    }

    fn setup_db() -> (TempDir, DatabaseEnv) {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let db = init_db_for::<_, Tables>(temp_dir.path(), DatabaseArguments::default())
            .expect("Failed to init database");
        (temp_dir, db)
    }

    #[test]
    fn test_counter_defaults_to_zero() {
        let (_dir, db) = setup_db();
        let tx = db.tx().expect("Failed to create transaction");
        let provider = CounterProvider::new(&tx);
        assert_eq!(provider.get_count(CounterKey::TotalTxCount).unwrap(), 0);
        assert_eq!(provider.get_count(CounterKey::PodCount).unwrap(), 0);
    }

    #[test]
    fn test_counter_read_write() {
        let (_dir, db) = setup_db();
        let write_tx = db.tx_mut().expect("Failed to create write transaction");
        let provider = CounterProvider::new(&write_tx);
        provider.set_count(CounterKey::TotalTxCount, 41).unwrap();
        provider.set_count(CounterKey::PodCount, 7).unwrap();
        write_tx.commit().expect("Failed to commit");

        let tx = db.tx().expect("Failed to create transaction");
        let provider = CounterProvider::new(&tx);
        assert_eq!(provider.get_count(CounterKey::TotalTxCount).unwrap(), 41);
        assert_eq!(provider.get_count(CounterKey::PodCount).unwrap(), 7);
    }

    #[test]
    fn test_malformed_counter_is_decode_error() {
        let (_dir, db) = setup_db();
        let write_tx = db.tx_mut().expect("Failed to create write transaction");
        write_tx
            .put::<RawCounters>(CounterKey::PodCount, RawText("seven".to_string()))
            .expect("Failed to plant raw counter");
        write_tx.commit().expect("Failed to commit");

        let tx = db.tx().expect("Failed to create transaction");
        let err = CounterProvider::new(&tx).get_count(CounterKey::PodCount).unwrap_err();
        assert!(err.is_decode(), "unexpected error: {err:?}");
    }
}
