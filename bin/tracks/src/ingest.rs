//! Feeds committed batches from a JSON-lines file to the pod indexer.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracks_types::Batch;

/// Parses one line of an ingest file. Blank lines yield `None`.
pub(crate) fn parse_batch(line: &str) -> Result<Option<Batch>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

/// Reads `path` line by line and sends every batch to `batch_tx`, in file order.
///
/// Returns the number of batches sent. Stops early when `cancel` fires or the
/// receiver is dropped.
pub(crate) async fn ingest_file(
    path: PathBuf,
    batch_tx: mpsc::Sender<Batch>,
    cancel: CancellationToken,
) -> Result<usize> {
    let file = File::open(&path)
        .await
        .with_context(|| format!("Failed to open ingest file '{}'", path.display()))?;
    let mut lines = BufReader::new(file).lines();

    let mut sent = 0;
    let mut line_number = 0;
    while let Some(line) = lines.next_line().await.with_context(|| read_error(&path))? {
        line_number += 1;
        let Some(batch) = parse_batch(&line).with_context(|| {
            format!("Invalid batch on line {line_number} of '{}'", path.display())
        })?
        else {
            continue;
        };

        debug!(target: "tracks_ingest", line_number, size = batch.size(), "Submitting batch");
        tokio::select! {
            result = batch_tx.send(batch) => {
                if result.is_err() {
                    info!(target: "tracks_ingest", "Pod indexer stopped, ending ingest");
                    break;
                }
                sent += 1;
            }
            _ = cancel.cancelled() => break,
        }
    }

    info!(target: "tracks_ingest", path = %path.display(), batches = sent, "Finished ingesting batches");
    Ok(sent)
}

fn read_error(path: &Path) -> String {
    format!("Failed to read ingest file '{}'", path.display())
}
