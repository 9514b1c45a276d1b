//! Providers for pod indexer state.
//!
//! Each provider wraps a database transaction and covers one table:
//! - pod pages ([`PodProvider`])
//! - scalar counters ([`CounterProvider`])
//! - the nonce ledger ([`NonceProvider`])
mod pod_provider;
pub(crate) use pod_provider::PodProvider;

mod counter_provider;
pub(crate) use counter_provider::CounterProvider;

mod nonce_provider;
pub(crate) use nonce_provider::NonceProvider;
