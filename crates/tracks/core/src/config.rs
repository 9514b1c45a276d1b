//! Indexer configuration.

use std::{fmt, num::NonZeroUsize, str::FromStr};

/// Number of records per pod when nothing else is configured.
pub const DEFAULT_POD_CAPACITY: NonZeroUsize = match NonZeroUsize::new(25) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Event markers identifying a bridged EVM transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMatcher {
    /// `action` attribute of the `message` event that marks a bridged transaction.
    pub action: String,
    /// `module` attribute of the `message` event carrying the EVM sender.
    pub module: String,
    /// Exact attribute count an `ethereum_tx` event must have to be read.
    pub ethereum_tx_attributes: usize,
}

impl EventMatcher {
    /// Action emitted by the ethermint EVM module for `MsgEthereumTx`.
    pub const ETHERMINT_ACTION: &'static str = "/ethermint.evm.v1.MsgEthereumTx";
    /// Module name emitted by the ethermint EVM module.
    pub const ETHERMINT_MODULE: &'static str = "evm";
    /// Attribute count of a well-formed ethermint `ethereum_tx` event.
    pub const ETHERMINT_TX_ATTRIBUTES: usize = 6;
}

impl Default for EventMatcher {
    fn default() -> Self {
        Self {
            action: Self::ETHERMINT_ACTION.to_string(),
            module: Self::ETHERMINT_MODULE.to_string(),
            ethereum_tx_attributes: Self::ETHERMINT_TX_ATTRIBUTES,
        }
    }
}

/// What to do with a matched transaction whose EVM sender could not be extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingSenderPolicy {
    /// Index the record with an empty sender. Balances are queried for the zero
    /// address and the nonce is drawn from the empty-sender ledger entry.
    #[default]
    Index,
    /// Skip the transaction with a warning.
    Skip,
    /// Abort the batch with [`crate::PodIndexerError::MissingSender`].
    Reject,
}

impl MissingSenderPolicy {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Skip => "skip",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for MissingSenderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingSenderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "index" => Ok(Self::Index),
            "skip" => Ok(Self::Skip),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown missing-sender policy: {other}")),
        }
    }
}

/// Configuration of a [`crate::PodIndexer`], fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    /// Number of records that fill a pod.
    pub pod_capacity: NonZeroUsize,
    /// Handling of matched transactions without an EVM sender.
    pub missing_sender: MissingSenderPolicy,
    /// Markers used to recognise bridged transactions.
    pub matcher: EventMatcher,
}

impl IndexerConfig {
    /// Creates a config with the given pod capacity and default everything else.
    pub fn with_pod_capacity(pod_capacity: NonZeroUsize) -> Self {
        Self { pod_capacity, ..Default::default() }
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            pod_capacity: DEFAULT_POD_CAPACITY,
            missing_sender: MissingSenderPolicy::default(),
            matcher: EventMatcher::default(),
        }
    }
}
