use crate::{BalanceOracle, BalanceOracleError};
use alloy_network::Ethereum;
use alloy_primitives::{Address, hex};
use alloy_provider::{Provider, RootProvider};
use async_trait::async_trait;
use std::borrow::Cow;
use tracing::{info, warn};
use url::Url;

/// [`BalanceOracle`] backed by an EVM JSON-RPC endpoint (`eth_getBalance`).
///
/// Each query is a single attempt; wrap it in a [`crate::RetryingBalanceOracle`]
/// to retry failures.
#[derive(Debug, Clone)]
pub struct AlloyBalanceOracle {
    provider: RootProvider<Ethereum>,
}

impl AlloyBalanceOracle {
    /// Creates an oracle for the HTTP endpoint at `url` without contacting it.
    pub fn new_http(url: Url) -> Self {
        Self { provider: RootProvider::<Ethereum>::new_http(url) }
    }

    /// Creates an oracle for the HTTP endpoint at `url` and checks that it answers.
    pub async fn connect(url: Url) -> Result<Self, BalanceOracleError> {
        let oracle = Self::new_http(url.clone());
        let chain_id = oracle
            .provider
            .get_chain_id()
            .await
            .map_err(|source| BalanceOracleError::Connect { url: url.to_string(), source })?;
        info!(target: "tracks_oracle", %url, chain_id, "Connected to balance oracle");
        Ok(oracle)
    }
}

/// Converts hex account text into an [`Address`].
///
/// Short input is left-padded with zeros and long input keeps its last 20 bytes.
/// Empty or non-hex input resolves to the zero address.
fn parse_address(address: &str) -> Address {
    let digits = address.strip_prefix("0x").or_else(|| address.strip_prefix("0X")).unwrap_or(address);
    if digits.is_empty() {
        return Address::ZERO;
    }
    let digits: Cow<'_, str> =
        if digits.len() % 2 == 1 { Cow::Owned(format!("0{digits}")) } else { Cow::Borrowed(digits) };

    match hex::decode(digits.as_ref()) {
        Ok(bytes) => {
            let tail = &bytes[bytes.len().saturating_sub(Address::len_bytes())..];
            Address::left_padding_from(tail)
        }
        Err(err) => {
            warn!(target: "tracks_oracle", %address, %err, "Invalid account address, querying zero address");
            Address::ZERO
        }
    }
}

#[async_trait]
impl BalanceOracle for AlloyBalanceOracle {
    async fn balance_at(&self, address: &str, height: u64) -> Result<String, BalanceOracleError> {
        let account = parse_address(address);
        let balance = self.provider.get_balance(account).number(height).await?;
        Ok(balance.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use rstest::rstest;

    #[rstest]
    #[case::prefixed("0x00000000000000000000000000000000000000aa", address!("0x00000000000000000000000000000000000000aa"))]
    #[case::unprefixed("00000000000000000000000000000000000000aa", address!("0x00000000000000000000000000000000000000aa"))]
    #[case::short("0xaa", address!("0x00000000000000000000000000000000000000aa"))]
    #[case::odd_length("0xabc", address!("0x0000000000000000000000000000000000000abc"))]
    #[case::long("0x1122000000000000000000000000000000000000000033", address!("0x0000000000000000000000000000000000000033"))]
    #[case::empty("", Address::ZERO)]
    #[case::bare_prefix("0x", Address::ZERO)]
    #[case::bech32("cosmos1xyz", Address::ZERO)]
    fn test_parse_address(#[case] input: &str, #[case] expected: Address) {
        assert_eq!(parse_address(input), expected);
    }

    #[tokio::test]
    async fn test_connect_fails_for_unreachable_endpoint() {
        let url = Url::parse("http://127.0.0.1:1").expect("valid url");
        let err = AlloyBalanceOracle::connect(url).await.unwrap_err();
        assert!(matches!(err, BalanceOracleError::Connect { .. }));
    }
}
