//! Database table schemas used by the pod indexer.
//!
//! This module defines the value types, keys, and table layouts for all data
//! persisted by the indexer: the pod pages, the scalar counters and the nonce
//! ledger.
//!
//! The tables are registered using [`reth_db_api::table::TableInfo`] and grouped into a
//! [`reth_db_api::TableSet`] for database initialization via Reth's storage-api.

mod pod;
pub use pod::{PodPage, Pods};
mod counter;
pub use counter::{CounterKey, Counters, TextCount};
mod nonce;
pub use nonce::{AccountKey, Nonces};

/// Implements [`reth_db_api::table::Compress`] and [`reth_db_api::table::Decompress`] for
/// types that implement [`serde::Serialize`] and [`serde::de::DeserializeOwned`].
///
/// Values are stored as JSON. Bytes that do not parse back into the type are
/// reported as [`reth_db_api::DatabaseError::Decode`].
///
/// # Example
/// ```ignore
/// impl_compression_for_json!(PodPage);
/// ```
macro_rules! impl_compression_for_json {
    ($($name:ty),+ $(,)?) => {
        $(
            impl reth_db_api::table::Compress for $name {
                type Compressed = Vec<u8>;

                fn compress_to_buf<B: bytes::BufMut + AsMut<[u8]>>(&self, buf: &mut B) {
                    let _ = serde_json::to_writer(bytes::BufMut::writer(buf), self);
                }
            }

            impl reth_db_api::table::Decompress for $name {
                fn decompress(value: &[u8]) -> Result<$name, reth_db_api::DatabaseError> {
                    serde_json::from_slice(value).map_err(|_| reth_db_api::DatabaseError::Decode)
                }
            }
        )+
    };
}

/// Implements [`reth_db_api::table::TableInfo`] for one or more table types that implement
/// [`reth_db_api::table::Table`].
///
/// This allows the table to be registered and introspected by the Reth database schema system.
macro_rules! impl_table_info {
    ($($table:ty),+ $(,)?) => {
        $(
            impl reth_db_api::table::TableInfo for $table
            where
                $table: reth_db_api::table::Table,
            {
                fn name(&self) -> &'static str {
                    <$table as reth_db_api::table::Table>::NAME
                }

                fn is_dupsort(&self) -> bool {
                    <$table as reth_db_api::table::Table>::DUPSORT
                }
            }
        )+
    };
}

/// Declares a struct representing a collection of tables and implements [`reth_db_api::TableSet`]
/// for it.
///
/// The resulting struct can be passed to Reth's `init_db_for::<_, YourTableSet>()`
/// to initialize only the specified tables.
macro_rules! impl_table_set {
    (
        $(#[$outer:meta])*
        $set_name:ident, $($table:ty),+ $(,)?
    ) => {
        $(#[$outer])*
        #[derive(Debug)]
        pub(crate) struct $set_name;

        impl reth_db_api::TableSet for $set_name {
            fn tables() -> Box<dyn Iterator<Item = Box<dyn reth_db_api::table::TableInfo>>> {
                Box::new(vec![
                    $(
                        Box::new(<$table>::default()) as Box<dyn reth_db_api::table::TableInfo>
                    ),*
                ].into_iter())
            }
        }
    };
}

impl_compression_for_json!(PodPage);

impl_table_info!(Pods, Counters, Nonces);

impl_table_set!(
    /// Every table used by the pod indexer.
    Tables,
    Pods,
    Counters,
    Nonces
);
