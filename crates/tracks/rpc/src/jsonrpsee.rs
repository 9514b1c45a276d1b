//! The `tracks` namespace.

use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use tracks_types::TransactionRecord;

/// Read-only access to the pod log.
#[cfg_attr(not(feature = "client"), rpc(server, namespace = "tracks"))]
#[cfg_attr(feature = "client", rpc(server, client, namespace = "tracks"))]
pub trait TracksApi {
    /// Returns the index of the current (partially filled) pod.
    ///
    /// Every pod below this index is full.
    #[method(name = "pod_count")]
    async fn pod_count(&self) -> RpcResult<u64>;

    /// Returns the transaction records of the pod at `pod_number`, in indexing order.
    ///
    /// Fails if the pod was never written.
    #[method(name = "get_pod")]
    async fn get_pod(
        &self,
        #[argument(rename = "podNumber")] pod_number: u64,
    ) -> RpcResult<Vec<TransactionRecord>>;

    /// Returns the total number of transaction records indexed so far.
    #[method(name = "tx_count")]
    async fn tx_count(&self) -> RpcResult<u64>;
}
