//! Server-side implementation of the `tracks` RPC API.

use crate::{PodQuery, PodQueryError, metrics::Metrics};
use async_trait::async_trait;
use jsonrpsee::{
    core::RpcResult,
    types::{ErrorObject, ErrorObjectOwned, error::ErrorCode},
};
use tracing::{trace, warn};
use tracks_rpc::TracksApiServer;
use tracks_storage::PodStorageReader;
use tracks_types::TransactionRecord;

/// The server-side implementation of [`TracksApiServer`].
#[derive(Debug)]
pub struct TracksRpc<R> {
    query: PodQuery<R>,
}

impl<R> TracksRpc<R> {
    /// Creates a new [`TracksRpc`] serving the pods visible through `query`.
    pub fn new(query: PodQuery<R>) -> Self {
        Metrics::init();
        trace!(target: "tracks_rpc", "Creating new TracksRpc handler");
        Self { query }
    }
}

fn into_rpc_error(method: &'static str, err: PodQueryError) -> ErrorObjectOwned {
    warn!(target: "tracks_rpc", method, %err, "Pod query failed");
    ErrorObject::owned(ErrorCode::InternalError.code(), err.to_string(), None::<()>)
}

fn observe<T>(method: &'static str, result: Result<T, PodQueryError>) -> RpcResult<T> {
    Metrics::record_rpc_call(method, &result);
    result.map_err(|err| into_rpc_error(method, err))
}

#[async_trait]
impl<R> TracksApiServer for TracksRpc<R>
where
    R: PodStorageReader + Send + Sync + 'static,
{
    async fn pod_count(&self) -> RpcResult<u64> {
        trace!(target: "tracks_rpc", "Received pod_count request");
        observe("pod_count", self.query.pod_count())
    }

    async fn get_pod(&self, pod_number: u64) -> RpcResult<Vec<TransactionRecord>> {
        trace!(target: "tracks_rpc", pod_number, "Received get_pod request");
        observe("get_pod", self.query.pod_txs(pod_number))
    }

    async fn tx_count(&self) -> RpcResult<u64> {
        trace!(target: "tracks_rpc", "Received tx_count request");
        observe("tx_count", self.query.tx_count())
    }
}
