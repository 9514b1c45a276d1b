use alloy_transport::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by a [`crate::BalanceOracle`].
#[derive(Debug, Error)]
pub enum BalanceOracleError {
    /// The endpoint could not be reached when the oracle was created.
    #[error("failed to connect to balance oracle at {url}: {source}")]
    Connect {
        /// The configured endpoint.
        url: String,
        /// The transport failure.
        #[source]
        source: TransportError,
    },

    /// A single balance query failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A bounded retry policy gave up.
    #[error("balance query failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made, including the first one.
        attempts: usize,
        /// The error returned by the last attempt.
        #[source]
        last: Box<BalanceOracleError>,
    },

    /// The retry deadline elapsed before any attempt succeeded.
    #[error("balance query did not succeed within {0:?}")]
    DeadlineElapsed(Duration),
}
