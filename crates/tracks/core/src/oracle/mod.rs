//! Point-in-time account balances from an external EVM node.

use async_trait::async_trait;
use std::fmt::Debug;

mod error;
pub use error::BalanceOracleError;

mod alloy;
pub use alloy::AlloyBalanceOracle;

mod retry;
pub use retry::{DEFAULT_RETRY_DELAY, RetryPolicy, RetryingBalanceOracle};

/// Source of account balances as of a given block.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceOracle: Debug + Send + Sync {
    /// Returns the balance of `address` at the end of block `height`, as a decimal string.
    async fn balance_at(&self, address: &str, height: u64) -> Result<String, BalanceOracleError>;
}
