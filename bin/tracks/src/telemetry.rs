//! Tracing and Prometheus setup.

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, SocketAddr};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

/// Maps the `-v` count onto the default log level. `RUST_LOG` directives take precedence.
pub(crate) const fn verbosity_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global tracing subscriber.
pub(crate) fn init_tracing_subscriber(verbosity: u8) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level(verbosity).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

/// Installs the Prometheus recorder and serves it over HTTP at `addr:port`.
pub(crate) fn init_prometheus_server(addr: IpAddr, port: u16) -> Result<()> {
    let socket = SocketAddr::new(addr, port);
    PrometheusBuilder::new().with_http_listener(socket).install()?;
    info!(target: "prometheus", "Serving metrics at: http://{socket}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_level() {
        assert_eq!(verbosity_level(0), LevelFilter::INFO);
        assert_eq!(verbosity_level(1), LevelFilter::DEBUG);
        assert_eq!(verbosity_level(2), LevelFilter::TRACE);
        assert_eq!(verbosity_level(7), LevelFilter::TRACE);
    }
}
