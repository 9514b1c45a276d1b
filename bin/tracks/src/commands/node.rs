use crate::{
    flags::{OracleArgs, StoreArgs},
    ingest::ingest_file,
};
use anyhow::{Context as _, Result};
use clap::Args;
use jsonrpsee::server::ServerBuilder;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracks_core::{
    AlloyBalanceOracle, IndexerConfig, MissingSenderPolicy, PodIndexer, PodIndexerActor, PodQuery,
    RetryingBalanceOracle, TracksRpc, reconcile,
};
use tracks_rpc::TracksApiServer;

/// Capacity of the queue between the batch source and the pod indexer.
const BATCH_QUEUE_SIZE: usize = 64;

/// Runs the pod indexer and serves the `tracks` RPC namespace.
#[derive(Args, Clone, Debug)]
pub(crate) struct NodeCommand {
    /// Pod store arguments.
    #[command(flatten)]
    pub(crate) store: StoreArgs,
    /// Balance oracle arguments.
    #[command(flatten)]
    pub(crate) oracle: OracleArgs,
    /// How to handle bridged transactions without an EVM sender: index, skip or reject.
    #[arg(long = "missing-sender", env = "TRACKS_MISSING_SENDER", default_value_t = MissingSenderPolicy::Index)]
    pub(crate) missing_sender: MissingSenderPolicy,
    /// IP address for the RPC server to listen on.
    #[arg(long = "rpc.addr", env = "TRACKS_RPC_ADDR", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub(crate) rpc_address: IpAddr,
    /// Port for the RPC server to listen on.
    #[arg(long = "rpc.port", env = "TRACKS_RPC_PORT", default_value_t = 8555)]
    pub(crate) rpc_port: u16,
    /// JSON-lines file of committed batches to index.
    #[arg(long, env = "TRACKS_INGEST")]
    pub(crate) ingest: Option<PathBuf>,
    /// Start even if the pod store fails the consistency check.
    #[arg(long = "skip-reconcile")]
    pub(crate) skip_reconcile: bool,
}

impl NodeCommand {
    /// Returns the [`IndexerConfig`] selected by the flags.
    pub(crate) fn indexer_config(&self) -> IndexerConfig {
        IndexerConfig {
            missing_sender: self.missing_sender,
            ..IndexerConfig::with_pod_capacity(self.store.pod_capacity)
        }
    }

    /// Runs the node until ctrl-c is pressed or the pod indexer fails.
    pub(crate) async fn run(self) -> Result<()> {
        let store = self.store.open()?;
        match reconcile(store.clone(), self.store.pod_capacity) {
            Ok(_) => {}
            Err(err) if self.skip_reconcile => {
                warn!(target: "tracks_node", %err, "Pod store is inconsistent, starting anyway");
            }
            Err(err) => return Err(err).context("Pod store check failed"),
        }

        let oracle = AlloyBalanceOracle::connect(self.oracle.rpc.clone())
            .await
            .context("Failed to connect to the balance oracle")?;
        let policy = self.oracle.retry_policy();
        if !policy.is_bounded() {
            warn!(
                target: "tracks_node",
                "Balance queries are retried without limit, an unreachable oracle stalls indexing"
            );
        }
        let oracle = RetryingBalanceOracle::new(oracle, policy);

        let rpc_addr = SocketAddr::new(self.rpc_address, self.rpc_port);
        let server = ServerBuilder::default()
            .build(rpc_addr)
            .await
            .with_context(|| format!("Failed to bind RPC server to {rpc_addr}"))?;
        let rpc_addr = server.local_addr().unwrap_or(rpc_addr);
        let rpc_handle = server.start(TracksRpc::new(PodQuery::new(store.clone())).into_rpc());
        info!(target: "tracks_node", %rpc_addr, "RPC server started");

        let cancel = CancellationToken::new();
        let (batch_tx, batch_rx) = mpsc::channel(BATCH_QUEUE_SIZE);
        let indexer = PodIndexer::new(store, oracle, self.indexer_config());
        let actor = PodIndexerActor::new(indexer, cancel.clone(), batch_rx);
        let indexer_task = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let result = actor.start().await;
                if result.is_err() {
                    cancel.cancel();
                }
                result
            })
        };

        match self.ingest {
            Some(path) => {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if let Err(err) = ingest_file(path, batch_tx, cancel.clone()).await {
                        error!(target: "tracks_node", ?err, "Ingest failed");
                        cancel.cancel();
                    }
                });
            }
            None => {
                info!(target: "tracks_node", "No batch source configured, serving existing pods only");
                drop(batch_tx);
            }
        }

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for ctrl-c")?;
                info!(target: "tracks_node", "Received ctrl-c, shutting down");
            }
            _ = cancel.cancelled() => {
                warn!(target: "tracks_node", "Shutting down after a fatal error");
            }
        }
        cancel.cancel();

        let indexer_result = indexer_task.await.context("Pod indexer task panicked")?;
        if rpc_handle.stop().is_ok() {
            rpc_handle.stopped().await;
        }
        indexer_result.context("Pod indexer failed")?;

        info!(target: "tracks_node", "Shutdown complete");
        Ok(())
    }
}
