//! Projection of a committed transaction's events onto bridged transaction fields.

use crate::EventMatcher;
use tracks_types::Event;

const MESSAGE_EVENT: &str = "message";
const ETHEREUM_TX_EVENT: &str = "ethereum_tx";
const TRANSFER_EVENT: &str = "transfer";

/// Raw fields of a bridged EVM transaction, as emitted by the chain.
///
/// Attributes that were not found are left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTx {
    /// EVM transaction hash (`ethereum_tx.ethereumTxHash`).
    pub eth_tx_hash: String,
    /// Native transaction hash (`ethereum_tx.txHash`).
    pub tx_hash: String,
    /// EVM recipient (`ethereum_tx.recipient`).
    pub recipient: String,
    /// Transferred amount (`ethereum_tx.amount`).
    pub amount: String,
    /// Gas used (`ethereum_tx.txGasUsed`).
    pub gas: String,
    /// Native recipient (`transfer.recipient`).
    pub recipient_cosmos: String,
    /// Native sender (`transfer.sender`).
    pub sender_cosmos: String,
    /// EVM sender (`message.sender` of the EVM module message), used for balance
    /// and nonce lookups.
    pub sender: String,
}

/// Returns `true` if some `message` event carries the matcher's action.
pub fn is_bridged(events: &[Event], matcher: &EventMatcher) -> bool {
    events.iter().filter(|event| event.kind == MESSAGE_EVENT).any(|event| {
        event
            .attributes
            .iter()
            .any(|attr| attr.key == "action" && attr.value == matcher.action)
    })
}

/// Extracts the bridged transaction fields from `events`.
///
/// Returns `None` if the transaction is not a bridged EVM transaction. Events are
/// scanned in order and a later event overwrites the fields set by an earlier one
/// of the same kind.
pub fn extract(events: &[Event], matcher: &EventMatcher) -> Option<ExtractedTx> {
    if !is_bridged(events, matcher) {
        return None;
    }

    let attr = |event: &Event, key: &str| event.attribute(key).unwrap_or_default().to_string();

    let mut tx = ExtractedTx::default();
    for event in events {
        match event.kind.as_str() {
            ETHEREUM_TX_EVENT if event.attributes.len() == matcher.ethereum_tx_attributes => {
                tx.eth_tx_hash = attr(event, "ethereumTxHash");
                tx.tx_hash = attr(event, "txHash");
                tx.recipient = attr(event, "recipient");
                tx.amount = attr(event, "amount");
                tx.gas = attr(event, "txGasUsed");
            }
            TRANSFER_EVENT => {
                tx.recipient_cosmos = attr(event, "recipient");
                tx.sender_cosmos = attr(event, "sender");
            }
            MESSAGE_EVENT if event.attribute("module") == Some(matcher.module.as_str()) => {
                tx.sender = attr(event, "sender");
            }
            _ => {}
        }
    }
    Some(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn action(value: &str) -> Event {
        Event::new("message", [("action", value)])
    }

    fn ethereum_tx(recipient: &str) -> Event {
        Event::new(
            "ethereum_tx",
            [
                ("amount", "1000"),
                ("ethereumTxHash", "0xeth"),
                ("txIndex", "0"),
                ("txGasUsed", "21000"),
                ("txHash", "ABCD"),
                ("recipient", recipient),
            ],
        )
    }

    #[test]
    fn test_non_bridged_events_are_skipped() {
        let matcher = EventMatcher::default();
        let events = vec![
            Event::new("message", [("action", "/cosmos.bank.v1beta1.MsgSend")]),
            Event::new("transfer", [("recipient", "cosmos1b"), ("sender", "cosmos1a")]),
        ];
        assert_eq!(extract(&events, &matcher), None);
        assert_eq!(extract(&[], &matcher), None);
    }

    #[test]
    fn test_extracts_all_fields() {
        let events = vec![
            action(EventMatcher::ETHERMINT_ACTION),
            ethereum_tx("0xbob"),
            Event::new("transfer", [("recipient", "cosmos1bob"), ("sender", "cosmos1alice")]),
            Event::new("message", [("module", "evm"), ("sender", "0xalice")]),
        ];

        let tx = extract(&events, &EventMatcher::default()).expect("bridged");
        assert_eq!(
            tx,
            ExtractedTx {
                eth_tx_hash: "0xeth".into(),
                tx_hash: "ABCD".into(),
                recipient: "0xbob".into(),
                amount: "1000".into(),
                gas: "21000".into(),
                recipient_cosmos: "cosmos1bob".into(),
                sender_cosmos: "cosmos1alice".into(),
                sender: "0xalice".into(),
            }
        );
    }

    #[test]
    fn test_missing_attributes_are_empty() {
        let events = vec![action(EventMatcher::ETHERMINT_ACTION)];
        let tx = extract(&events, &EventMatcher::default()).expect("bridged");
        assert_eq!(tx, ExtractedTx::default());
    }

    #[rstest]
    #[case::too_few(5)]
    #[case::too_many(7)]
    fn test_ethereum_tx_with_unexpected_attribute_count_is_ignored(#[case] count: usize) {
        let mut event = ethereum_tx("0xbob");
        event.attributes.resize(count, tracks_types::EventAttribute::new("pad", "pad"));

        let tx = extract(&[action(EventMatcher::ETHERMINT_ACTION), event], &EventMatcher::default())
            .expect("bridged");
        assert!(tx.eth_tx_hash.is_empty());
        assert!(tx.recipient.is_empty());
    }

    #[test]
    fn test_later_events_overwrite_earlier_ones() {
        let events = vec![
            action(EventMatcher::ETHERMINT_ACTION),
            ethereum_tx("0xfirst"),
            Event::new("transfer", [("recipient", "cosmos1first"), ("sender", "cosmos1a")]),
            ethereum_tx("0xsecond"),
            Event::new("transfer", [("recipient", "cosmos1second"), ("sender", "cosmos1a")]),
        ];
        let tx = extract(&events, &EventMatcher::default()).expect("bridged");
        assert_eq!(tx.recipient, "0xsecond");
        assert_eq!(tx.recipient_cosmos, "cosmos1second");
    }

    #[test]
    fn test_sender_only_from_matching_module() {
        let events = vec![
            action(EventMatcher::ETHERMINT_ACTION),
            Event::new("message", [("module", "evm"), ("sender", "0xalice")]),
            Event::new("message", [("module", "bank"), ("sender", "0xmallory")]),
        ];
        let tx = extract(&events, &EventMatcher::default()).expect("bridged");
        assert_eq!(tx.sender, "0xalice");
    }

    #[test]
    fn test_first_attribute_wins_within_event() {
        let events = vec![
            action(EventMatcher::ETHERMINT_ACTION),
            Event::new("message", [("module", "evm"), ("sender", "0xa"), ("sender", "0xb")]),
        ];
        let tx = extract(&events, &EventMatcher::default()).expect("bridged");
        assert_eq!(tx.sender, "0xa");
    }

    #[test]
    fn test_custom_matcher() {
        let matcher = EventMatcher {
            action: "/custom.v1.MsgBridge".to_string(),
            module: "bridge".to_string(),
            ethereum_tx_attributes: 6,
        };
        let events = vec![
            action("/custom.v1.MsgBridge"),
            Event::new("message", [("module", "bridge"), ("sender", "0xalice")]),
        ];
        assert_eq!(extract(&events, &matcher).map(|tx| tx.sender), Some("0xalice".to_string()));
        assert!(!is_bridged(&events, &EventMatcher::default()));
    }
}
