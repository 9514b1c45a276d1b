use crate::{IndexSummary, PodIndexerError};
use std::time::Duration;

/// Metric names and recorders of the pod indexer.
#[derive(Debug, Clone)]
pub(crate) struct Metrics;

impl Metrics {
    pub(crate) const INDEXED_TXS_TOTAL: &'static str = "tracks_indexed_txs_total";
    pub(crate) const SKIPPED_TXS_TOTAL: &'static str = "tracks_skipped_txs_total";
    pub(crate) const INDEX_BATCH_SUCCESS_TOTAL: &'static str = "tracks_index_batch_success_total";
    pub(crate) const INDEX_BATCH_ERROR_TOTAL: &'static str = "tracks_index_batch_error_total";
    pub(crate) const INDEX_BATCH_DURATION_SECONDS: &'static str =
        "tracks_index_batch_duration_seconds";
    pub(crate) const CURRENT_POD_INDEX: &'static str = "tracks_current_pod_index";
    pub(crate) const ORACLE_RETRIES_TOTAL: &'static str = "tracks_oracle_retries_total";
    pub(crate) const RPC_REQUESTS_TOTAL: &'static str = "tracks_rpc_requests_total";
    pub(crate) const RPC_REQUEST_ERRORS_TOTAL: &'static str = "tracks_rpc_request_errors_total";

    /// Describes and zeroes every metric.
    pub(crate) fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::INDEXED_TXS_TOTAL,
            metrics::Unit::Count,
            "Total number of transaction records appended to pods",
        );
        metrics::describe_counter!(
            Self::SKIPPED_TXS_TOTAL,
            metrics::Unit::Count,
            "Total number of batch slots that produced no record",
        );
        metrics::describe_counter!(
            Self::INDEX_BATCH_SUCCESS_TOTAL,
            metrics::Unit::Count,
            "Total number of successfully indexed batches",
        );
        metrics::describe_counter!(
            Self::INDEX_BATCH_ERROR_TOTAL,
            metrics::Unit::Count,
            "Total number of batches whose indexing failed",
        );
        metrics::describe_histogram!(
            Self::INDEX_BATCH_DURATION_SECONDS,
            metrics::Unit::Seconds,
            "Latency of indexing one batch, balance queries included",
        );
        metrics::describe_gauge!(
            Self::CURRENT_POD_INDEX,
            metrics::Unit::Count,
            "Index of the pod currently being filled",
        );
        metrics::describe_counter!(
            Self::ORACLE_RETRIES_TOTAL,
            metrics::Unit::Count,
            "Total number of retried balance queries",
        );
        metrics::describe_counter!(
            Self::RPC_REQUESTS_TOTAL,
            metrics::Unit::Count,
            "Total number of pod RPC requests",
        );
        metrics::describe_counter!(
            Self::RPC_REQUEST_ERRORS_TOTAL,
            metrics::Unit::Count,
            "Total number of pod RPC requests that returned an error",
        );
    }

    fn zero() {
        metrics::counter!(Self::INDEXED_TXS_TOTAL).increment(0);
        metrics::counter!(Self::SKIPPED_TXS_TOTAL).increment(0);
        metrics::counter!(Self::INDEX_BATCH_SUCCESS_TOTAL).increment(0);
        metrics::counter!(Self::INDEX_BATCH_ERROR_TOTAL).increment(0);
        metrics::histogram!(Self::INDEX_BATCH_DURATION_SECONDS).record(0.0);
        metrics::gauge!(Self::CURRENT_POD_INDEX).set(0.0);
        metrics::counter!(Self::ORACLE_RETRIES_TOTAL).increment(0);
    }

    pub(crate) fn record_index_batch(
        elapsed: Duration,
        result: &Result<IndexSummary, PodIndexerError>,
    ) {
        match result {
            Ok(summary) => {
                metrics::counter!(Self::INDEX_BATCH_SUCCESS_TOTAL).increment(1);
                metrics::counter!(Self::INDEXED_TXS_TOTAL).increment(summary.indexed as u64);
                metrics::counter!(Self::SKIPPED_TXS_TOTAL).increment(summary.skipped as u64);
                if let Some(head) = summary.head {
                    metrics::gauge!(Self::CURRENT_POD_INDEX).set(head.current_pod_index as f64);
                }
                metrics::histogram!(Self::INDEX_BATCH_DURATION_SECONDS)
                    .record(elapsed.as_secs_f64());
            }
            Err(_) => {
                metrics::counter!(Self::INDEX_BATCH_ERROR_TOTAL).increment(1);
            }
        }
    }

    pub(crate) fn record_oracle_retry() {
        metrics::counter!(Self::ORACLE_RETRIES_TOTAL).increment(1);
    }

    pub(crate) fn record_rpc_call<T, E>(method: &'static str, result: &Result<T, E>) {
        metrics::counter!(Self::RPC_REQUESTS_TOTAL, "method" => method).increment(1);
        if result.is_err() {
            metrics::counter!(Self::RPC_REQUEST_ERRORS_TOTAL, "method" => method).increment(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PodHead;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_record_index_batch() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            Metrics::init();
            let head = PodHead { total_tx_count: 7, current_pod_index: 2 };
            let summary = IndexSummary { indexed: 3, skipped: 1, head: Some(head) };
            Metrics::record_index_batch(Duration::from_millis(20), &Ok(summary));
            Metrics::record_index_batch(Duration::ZERO, &Ok(IndexSummary::default()));
            Metrics::record_index_batch(
                Duration::ZERO,
                &Err(PodIndexerError::MissingSender { height: 1, index: 0 }),
            );
        });

        let rendered = handle.render();
        assert!(rendered.contains("tracks_indexed_txs_total 3"));
        assert!(rendered.contains("tracks_skipped_txs_total 1"));
        assert!(rendered.contains("tracks_index_batch_error_total 1"));
        assert!(rendered.contains("tracks_current_pod_index 2"));
    }
}
