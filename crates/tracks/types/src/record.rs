//! The bridged transaction record persisted in pods.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A bridged EVM transaction projected out of a committed transaction's events.
///
/// Every field is kept as the text the chain emitted (decimal or hex), so no
/// precision is lost across the serialization boundary. Use the `*_value`
/// accessors to parse a field strictly at the point of consumption.
///
/// Records are serialized with camelCase field names. A single record encoded
/// with PascalCase field names (`From`, `ToBalance` and so on) also decodes. Pod pages
/// themselves only exist in the layout of `tracks-storage`, so this does not make
/// pods written by other stores readable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// EVM sender address.
    #[serde(alias = "From")]
    pub from: String,
    /// EVM recipient address.
    #[serde(alias = "To")]
    pub to: String,
    /// Native (bech32) sender address.
    #[serde(alias = "FromCosmos")]
    pub from_cosmos: String,
    /// Native (bech32) recipient address.
    #[serde(alias = "ToCosmos")]
    pub to_cosmos: String,
    /// Transferred amount.
    #[serde(alias = "Amount")]
    pub amount: String,
    /// Gas used by the transaction.
    #[serde(alias = "Gas")]
    pub gas: String,
    /// Native transaction hash.
    #[serde(alias = "TxHash")]
    pub tx_hash: String,
    /// EVM transaction hash.
    #[serde(alias = "EthTxHash")]
    pub eth_tx_hash: String,
    /// Indexer-assigned sender nonce.
    #[serde(alias = "Nonce")]
    pub nonce: String,
    /// Sender balance at the end of the previous block.
    #[serde(alias = "FromBalance")]
    pub from_balance: String,
    /// Recipient balance at the end of the previous block.
    #[serde(alias = "ToBalance")]
    pub to_balance: String,
}

/// Error returned when a textual numeric field fails strict parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NumericFieldError {
    /// The field is empty.
    #[error("field `{field}` is empty")]
    Empty {
        /// Name of the field.
        field: &'static str,
    },
    /// The field is not a valid decimal or `0x`-prefixed hex number.
    #[error("field `{field}` has invalid numeric format: {value:?}")]
    InvalidFormat {
        /// Name of the field.
        field: &'static str,
        /// The raw text.
        value: String,
    },
    /// The field does not fit the target integer type.
    #[error("field `{field}` overflows {target}: {value:?}")]
    Overflow {
        /// Name of the field.
        field: &'static str,
        /// Name of the target type.
        target: &'static str,
        /// The raw text.
        value: String,
    },
}

impl TransactionRecord {
    /// Parses [`Self::amount`] as a 256-bit unsigned integer.
    pub fn amount_value(&self) -> Result<U256, NumericFieldError> {
        parse_u256("amount", &self.amount)
    }

    /// Parses [`Self::gas`] as a 64-bit unsigned integer.
    pub fn gas_value(&self) -> Result<u64, NumericFieldError> {
        parse_u64("gas", &self.gas)
    }

    /// Parses [`Self::nonce`] as a 64-bit unsigned integer.
    pub fn nonce_value(&self) -> Result<u64, NumericFieldError> {
        parse_u64("nonce", &self.nonce)
    }

    /// Parses [`Self::from_balance`] as a 256-bit unsigned integer.
    pub fn from_balance_value(&self) -> Result<U256, NumericFieldError> {
        parse_u256("fromBalance", &self.from_balance)
    }

    /// Parses [`Self::to_balance`] as a 256-bit unsigned integer.
    pub fn to_balance_value(&self) -> Result<U256, NumericFieldError> {
        parse_u256("toBalance", &self.to_balance)
    }
}

fn is_numeric_text(value: &str) -> bool {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => value.bytes().all(|b| b.is_ascii_digit()),
    }
}

fn parse_u256(field: &'static str, value: &str) -> Result<U256, NumericFieldError> {
    if value.is_empty() {
        return Err(NumericFieldError::Empty { field });
    }
    if !is_numeric_text(value) {
        return Err(NumericFieldError::InvalidFormat { field, value: value.to_string() });
    }
    value.parse::<U256>().map_err(|_| NumericFieldError::Overflow {
        field,
        target: "u256",
        value: value.to_string(),
    })
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64, NumericFieldError> {
    let wide = parse_u256(field, value)?;
    u64::try_from(wide).map_err(|_| NumericFieldError::Overflow {
        field,
        target: "u64",
        value: value.to_string(),
    })
}
