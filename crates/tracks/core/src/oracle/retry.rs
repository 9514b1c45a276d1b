use crate::{BalanceOracle, BalanceOracleError, metrics::Metrics};
use async_trait::async_trait;
use backon::{ConstantBuilder, Retryable};
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};
use tracing::{error, warn};

/// Delay between two attempts of a balance query when nothing else is configured.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// How failed balance queries are retried.
///
/// The default policy retries every failure after [`DEFAULT_RETRY_DELAY`] with
/// neither an attempt limit nor a deadline. Under that policy an unreachable
/// oracle stalls the caller until the endpoint recovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fixed delay between two attempts.
    pub delay: Duration,
    /// Maximum number of retries after the first attempt. `None` retries forever.
    pub max_retries: Option<usize>,
    /// Upper bound on the total time spent on one query, retries included.
    pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { delay: DEFAULT_RETRY_DELAY, max_retries: None, deadline: None }
    }
}

impl RetryPolicy {
    /// Returns `true` if the policy can give up on a query.
    pub const fn is_bounded(&self) -> bool {
        self.max_retries.is_some() || self.deadline.is_some()
    }

    fn backoff(&self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times(self.max_retries.unwrap_or(usize::MAX))
    }
}

/// [`BalanceOracle`] that retries the queries of an inner oracle according to a
/// [`RetryPolicy`].
#[derive(Debug)]
pub struct RetryingBalanceOracle<O> {
    inner: O,
    policy: RetryPolicy,
}

impl<O> RetryingBalanceOracle<O> {
    /// Wraps `inner` with the given retry policy.
    pub const fn new(inner: O, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Returns the retry policy.
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<O: BalanceOracle> BalanceOracle for RetryingBalanceOracle<O> {
    async fn balance_at(&self, address: &str, height: u64) -> Result<String, BalanceOracleError> {
        let attempts = AtomicUsize::new(0);
        let query = {
            let inner = &self.inner;
            let attempts = &attempts;
            move || async move {
                attempts.fetch_add(1, Ordering::Relaxed);
                inner.balance_at(address, height).await
            }
        };

        let retrying = query
            .retry(self.policy.backoff())
            .sleep(tokio::time::sleep)
            .notify(|err: &BalanceOracleError, delay: Duration| {
                Metrics::record_oracle_retry();
                warn!(
                    target: "tracks_oracle",
                    %address,
                    height,
                    %err,
                    ?delay,
                    "Balance query failed, retrying"
                );
            });

        let result = match self.policy.deadline {
            Some(deadline) => tokio::time::timeout(deadline, retrying).await.map_err(|_| {
                error!(target: "tracks_oracle", %address, height, ?deadline, "Balance query deadline elapsed");
                BalanceOracleError::DeadlineElapsed(deadline)
            })?,
            None => retrying.await,
        };

        result.map_err(|err| {
            let attempts = attempts.load(Ordering::Relaxed);
            error!(target: "tracks_oracle", %address, height, attempts, %err, "Balance query retries exhausted");
            BalanceOracleError::RetriesExhausted { attempts, last: Box::new(err) }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockBalanceOracle;
    use alloy_transport::TransportErrorKind;
    use std::sync::Arc;
    use tokio::time::Instant;

    fn transport_error() -> BalanceOracleError {
        TransportErrorKind::custom_str("connection refused").into()
    }

    /// Fails the first `failures` calls, then answers with `balance`.
    fn flaky_oracle(failures: usize, balance: &'static str) -> (MockBalanceOracle, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut oracle = MockBalanceOracle::new();
        oracle.expect_balance_at().returning(move |_, _| {
            if counter.fetch_add(1, Ordering::SeqCst) < failures {
                Err(transport_error())
            } else {
                Ok(balance.to_string())
            }
        });
        (oracle, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_does_not_wait() {
        let (inner, calls) = flaky_oracle(0, "42");
        let oracle = RetryingBalanceOracle::new(inner, RetryPolicy::default());

        let start = Instant::now();
        assert_eq!(oracle.balance_at("0xaa", 9).await.unwrap(), "42");
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_after_fixed_delay() {
        let (inner, calls) = flaky_oracle(1, "1000");
        let oracle = RetryingBalanceOracle::new(inner, RetryPolicy::default());

        let start = Instant::now();
        assert_eq!(oracle.balance_at("0xaa", 9).await.unwrap(), "1000");
        assert_eq!(start.elapsed(), DEFAULT_RETRY_DELAY);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_policy_outlasts_many_failures() {
        let (inner, calls) = flaky_oracle(50, "7");
        let oracle = RetryingBalanceOracle::new(inner, RetryPolicy::default());

        assert_eq!(oracle.balance_at("0xaa", 1).await.unwrap(), "7");
        assert_eq!(calls.load(Ordering::SeqCst), 51);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_retries_exhausted() {
        let (inner, calls) = flaky_oracle(usize::MAX, "0");
        let policy = RetryPolicy { max_retries: Some(2), ..Default::default() };
        let oracle = RetryingBalanceOracle::new(inner, policy);
        assert!(oracle.policy().is_bounded());

        let err = oracle.balance_at("0xaa", 1).await.unwrap_err();
        assert!(matches!(err, BalanceOracleError::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapsed() {
        let (inner, _calls) = flaky_oracle(usize::MAX, "0");
        let policy = RetryPolicy {
            delay: Duration::from_secs(1),
            max_retries: None,
            deadline: Some(Duration::from_millis(3500)),
        };
        let oracle = RetryingBalanceOracle::new(inner, policy);

        let start = Instant::now();
        let err = oracle.balance_at("0xaa", 1).await.unwrap_err();
        assert!(matches!(err, BalanceOracleError::DeadlineElapsed(d) if d == Duration::from_millis(3500)));
        assert_eq!(start.elapsed(), Duration::from_millis(3500));
    }
}
