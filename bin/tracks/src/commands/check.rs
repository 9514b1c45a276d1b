use crate::flags::StoreArgs;
use anyhow::{Context as _, Result};
use clap::Args;
use tracing::info;
use tracks_core::reconcile;

/// Checks the pod store for consistency and exits.
#[derive(Args, Clone, Debug)]
pub(crate) struct CheckCommand {
    /// Pod store arguments.
    #[command(flatten)]
    pub(crate) store: StoreArgs,
}

impl CheckCommand {
    /// Runs the consistency check.
    pub(crate) fn run(self) -> Result<()> {
        let store = self.store.open()?;
        let report = reconcile(store, self.store.pod_capacity).context("Pod store check failed")?;
        info!(
            target: "tracks_node",
            current_pod_index = report.current_pod_index,
            total_tx_count = report.total_tx_count,
            senders = report.senders,
            "Pod store check passed"
        );
        Ok(())
    }
}
