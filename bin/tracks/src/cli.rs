//! Contains the tracks node CLI.

use crate::{
    commands::{CheckCommand, NodeCommand},
    flags::GlobalArgs,
    telemetry::{init_prometheus_server, init_tracing_subscriber},
};
use anyhow::Result;
use clap::{Parser, Subcommand};

/// Subcommands for the CLI.
#[derive(Debug, Clone, Subcommand)]
pub(crate) enum Commands {
    /// Runs the pod indexer and its RPC server.
    #[command(alias = "n")]
    Node(NodeCommand),
    /// Checks the pod store for consistency.
    Check(CheckCommand),
}

/// The tracks node CLI.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Global arguments for the CLI.
    #[command(flatten)]
    pub(crate) global: GlobalArgs,
    /// The subcommand to run.
    #[command(subcommand)]
    pub(crate) subcommand: Commands,
}

impl Cli {
    /// Runs the CLI.
    pub(crate) fn run(self) -> Result<()> {
        init_tracing_subscriber(self.global.v)?;

        let rt = Self::tokio_runtime()?;
        rt.block_on(async move {
            if self.global.metrics.enabled {
                init_prometheus_server(self.global.metrics.addr, self.global.metrics.port)?;
            }
            match self.subcommand {
                Commands::Node(node) => node.run().await,
                Commands::Check(check) => check.run(),
            }
        })
    }

    /// Creates a new default tokio multi-thread [Runtime](tokio::runtime::Runtime) with all
    /// features enabled.
    pub(crate) fn tokio_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
        tokio::runtime::Builder::new_multi_thread().enable_all().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::{num::NonZeroUsize, time::Duration};
    use tracks_core::MissingSenderPolicy;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tracks-node").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_node_defaults() {
        let cli = parse(&["node", "--datadir", "/tmp/tracks"]);
        let Commands::Node(node) = cli.subcommand else { panic!("expected node command") };

        assert_eq!(node.store.pod_capacity.get(), 25);
        assert_eq!(node.missing_sender, MissingSenderPolicy::Index);
        assert_eq!(node.oracle.rpc.as_str(), "http://0.0.0.0:8545/");
        assert_eq!(node.rpc_port, 8555);
        assert!(node.ingest.is_none());

        let policy = node.oracle.retry_policy();
        assert_eq!(policy.delay, Duration::from_secs(5));
        assert!(!policy.is_bounded());
        assert!(!cli.global.metrics.enabled);
        assert_eq!(cli.global.v, 0);
    }

    #[test]
    fn test_node_bounded_oracle() {
        let cli = parse(&[
            "-vv",
            "node",
            "--datadir",
            "/tmp/tracks",
            "--pod-capacity",
            "2",
            "--oracle.max-retries",
            "3",
            "--oracle.deadline",
            "30",
            "--missing-sender",
            "reject",
        ]);
        let Commands::Node(node) = cli.subcommand else { panic!("expected node command") };

        let policy = node.oracle.retry_policy();
        assert_eq!(policy.max_retries, Some(3));
        assert_eq!(policy.deadline, Some(Duration::from_secs(30)));

        let config = node.indexer_config();
        assert_eq!(config.pod_capacity, NonZeroUsize::new(2).unwrap());
        assert_eq!(config.missing_sender, MissingSenderPolicy::Reject);
        assert_eq!(cli.global.v, 2);
    }

    #[rstest]
    #[case::zero_capacity(&["check", "--datadir", "/tmp/tracks", "--pod-capacity", "0"])]
    #[case::missing_datadir(&["check"])]
    #[case::unknown_policy(&["node", "--datadir", "/tmp/tracks", "--missing-sender", "drop"])]
    fn test_invalid_args(#[case] args: &[&str]) {
        let result = Cli::try_parse_from(std::iter::once("tracks-node").chain(args.iter().copied()));
        assert!(result.is_err());
    }
}
