//! Fixtures shared by the unit tests of this crate.

use crate::{BalanceOracle, BalanceOracleError, EventMatcher};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tempfile::TempDir;
use tracks_storage::PodDb;
use tracks_types::{Event, ExecTxResult, TxResult};

/// Opens an empty pod database in a fresh temporary directory.
pub(crate) fn setup_db() -> (TempDir, Arc<PodDb>) {
    let dir = TempDir::new().expect("create temp dir");
    let db = PodDb::new(&dir.path().join("pods")).expect("open pod db");
    (dir, Arc::new(db))
}

/// A bridged EVM transfer from `sender` to `recipient`.
pub(crate) fn bridged_tx(height: i64, index: u32, sender: &str, recipient: &str) -> TxResult {
    let events = vec![
        Event::new("message", [("action", EventMatcher::ETHERMINT_ACTION)]),
        Event::new(
            "ethereum_tx",
            [
                ("amount", "1000000000000000000".to_string()),
                ("ethereumTxHash", format!("0xeth{height}-{index}")),
                ("txIndex", index.to_string()),
                ("txGasUsed", "21000".to_string()),
                ("txHash", format!("TXHASH{height}-{index}")),
                ("recipient", recipient.to_string()),
            ],
        ),
        Event::new("transfer", [("recipient", "cosmos1recipient"), ("sender", "cosmos1sender")]),
        Event::new("message", [("module", "evm"), ("sender", sender)]),
    ];
    TxResult { height, index, result: ExecTxResult { events }, ..Default::default() }
}

/// A native bank transfer, which the indexer ignores.
pub(crate) fn native_tx(height: i64, index: u32) -> TxResult {
    let events = vec![
        Event::new("message", [("action", "/cosmos.bank.v1beta1.MsgSend"), ("module", "bank")]),
        Event::new("transfer", [("recipient", "cosmos1b"), ("sender", "cosmos1a")]),
    ];
    TxResult { height, index, result: ExecTxResult { events }, ..Default::default() }
}

/// Oracle answering from a fixed table. Unknown balances read as `"0"`.
#[derive(Debug, Default)]
pub(crate) struct StaticOracle {
    balances: HashMap<(String, u64), String>,
    stalled: bool,
}

impl StaticOracle {
    pub(crate) fn with_balance(mut self, address: &str, height: u64, balance: &str) -> Self {
        self.balances.insert((address.to_string(), height), balance.to_string());
        self
    }

    /// Never answers.
    pub(crate) fn stalled(mut self) -> Self {
        self.stalled = true;
        self
    }
}

#[async_trait]
impl BalanceOracle for StaticOracle {
    async fn balance_at(&self, address: &str, height: u64) -> Result<String, BalanceOracleError> {
        if self.stalled {
            std::future::pending::<()>().await;
        }
        Ok(self
            .balances
            .get(&(address.to_string(), height))
            .cloned()
            .unwrap_or_else(|| "0".to_string()))
    }
}
