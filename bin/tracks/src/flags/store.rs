use anyhow::{Context as _, Result};
use clap::Args;
use std::{num::NonZeroUsize, path::PathBuf, sync::Arc};
use tracks_core::DEFAULT_POD_CAPACITY;
use tracks_storage::PodDb;

/// Pod store arguments.
#[derive(Args, Clone, Debug)]
pub(crate) struct StoreArgs {
    /// Directory holding the pod database.
    #[arg(long, env = "TRACKS_DATADIR")]
    pub(crate) datadir: PathBuf,
    /// Number of transaction records per pod. Must match the value the store was
    /// written with.
    #[arg(long = "pod-capacity", env = "TRACKS_POD_CAPACITY", default_value_t = DEFAULT_POD_CAPACITY)]
    pub(crate) pod_capacity: NonZeroUsize,
}

impl StoreArgs {
    /// Opens (or creates) the pod database under the data directory.
    pub(crate) fn open(&self) -> Result<Arc<PodDb>> {
        std::fs::create_dir_all(&self.datadir).with_context(|| {
            format!("Failed to create data directory '{}'", self.datadir.display())
        })?;
        let path = self.datadir.join("pods");
        let db = PodDb::new(&path)
            .with_context(|| format!("Failed to open pod database at '{}'", path.display()))?;
        Ok(Arc::new(db))
    }
}
