use clap::Args;
use std::time::Duration;
use tracks_core::RetryPolicy;
use url::Url;

/// Balance oracle arguments.
#[derive(Args, Clone, Debug)]
pub(crate) struct OracleArgs {
    /// EVM JSON-RPC endpoint queried for account balances.
    #[arg(long = "oracle.rpc", env = "TRACKS_ORACLE_RPC", default_value = "http://0.0.0.0:8545")]
    pub(crate) rpc: Url,
    /// Seconds to wait before retrying a failed balance query.
    #[arg(long = "oracle.retry-delay", env = "TRACKS_ORACLE_RETRY_DELAY", default_value_t = 5)]
    pub(crate) retry_delay: u64,
    /// Give up on a balance query after this many retries. Retries forever if unset.
    #[arg(long = "oracle.max-retries", env = "TRACKS_ORACLE_MAX_RETRIES")]
    pub(crate) max_retries: Option<usize>,
    /// Give up on a balance query after this many seconds. No deadline if unset.
    #[arg(long = "oracle.deadline", env = "TRACKS_ORACLE_DEADLINE")]
    pub(crate) deadline: Option<u64>,
}

impl OracleArgs {
    /// Returns the configured [`RetryPolicy`].
    pub(crate) const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            delay: Duration::from_secs(self.retry_delay),
            max_retries: self.max_retries,
            deadline: match self.deadline {
                Some(secs) => Some(Duration::from_secs(secs)),
                None => None,
            },
        }
    }
}
