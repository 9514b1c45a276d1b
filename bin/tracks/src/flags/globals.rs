//! Global arguments for the CLI.

use clap::{ArgAction, Args};
use std::net::{IpAddr, Ipv4Addr};

/// Global arguments for the CLI.
#[derive(Args, Clone, Debug)]
pub(crate) struct GlobalArgs {
    /// Verbosity level (0-2). `RUST_LOG` overrides it.
    #[arg(long = "verbosity", short = 'v', global = true, action = ArgAction::Count)]
    pub(crate) v: u8,
    /// Prometheus CLI arguments.
    #[command(flatten)]
    pub(crate) metrics: MetricsArgs,
}

/// Prometheus metrics arguments.
#[derive(Args, Clone, Debug)]
pub(crate) struct MetricsArgs {
    /// Serve Prometheus metrics.
    #[arg(long = "metrics.enabled", global = true, env = "TRACKS_METRICS_ENABLED")]
    pub(crate) enabled: bool,
    /// Address the metrics server listens on.
    #[arg(
        long = "metrics.addr",
        global = true,
        env = "TRACKS_METRICS_ADDR",
        default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    )]
    pub(crate) addr: IpAddr,
    /// Port the metrics server listens on.
    #[arg(long = "metrics.port", global = true, env = "TRACKS_METRICS_PORT", default_value_t = 9090)]
    pub(crate) port: u16,
}
