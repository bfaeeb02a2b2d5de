use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::Log;
use alloy::sol;

use crate::chain::types::{ErrorKind, OpError};

sol! {
    /// On-chain surface of the property registry consumed by this client.
    interface IPropertyRegistry {
        function paused() external view returns (bool);
        function unpause() external;
        function mintProperty(address to, string uri) external returns (uint256 tokenId);
        function getPropertyInfo(uint256 tokenId)
            external
            view
            returns (address owner, uint8 state, string uri);
    }
}

/// The keccak256 hash of `Transfer(address,address,uint256)`.
/// ERC-721 mints emit this with the token id in the fourth topic slot.
pub const TRANSFER_EVENT_TOPIC: B256 = {
    // 0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef
    B256::new([
        0xdd, 0xf2, 0x52, 0xad, 0x1b, 0xe2, 0xc8, 0x9b, 0x69, 0xc2, 0xb0, 0x68, 0xfc, 0x37,
        0x8d, 0xaa, 0x95, 0x2b, 0xa7, 0xf1, 0x63, 0xc4, 0xa1, 0x16, 0x28, 0xf5, 0x5a, 0x4d,
        0xf5, 0x23, 0xb3, 0xef,
    ])
};

/// Flat headroom added on top of the node's gas estimate before submission.
pub const GAS_PAD: u64 = 100_000;

/// Gas ceiling used for the mint transaction.
pub fn gas_ceiling(estimate: u64) -> u64 {
    estimate.saturating_add(GAS_PAD)
}

/// Scan a receipt's logs for the token id minted by `contract`.
///
/// The first log emitted by the contract whose topic0 is the Transfer
/// signature wins. The token id is the big-endian integer in topic index 3,
/// rendered as a decimal string. No matching log is a valid `None` outcome,
/// not an error; a matching log without a fourth topic is treated the same.
pub fn extract_minted_token_id(contract: Address, logs: &[Log]) -> Option<String> {
    let hit = logs.iter().find(|log| {
        log.inner.address == contract
            && log.inner.data.topics().first() == Some(&TRANSFER_EVENT_TOPIC)
    })?;
    let token_topic = hit.inner.data.topics().get(3)?;
    Some(U256::from_be_slice(token_topic.as_slice()).to_string())
}

/// Parse a user-supplied token id string as an unsigned 256-bit integer.
pub fn parse_token_id(input: &str) -> Result<U256, OpError> {
    input
        .trim()
        .parse::<U256>()
        .map_err(|_| OpError::new(ErrorKind::Input, format!("invalid token id: {input:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Bytes, Log as PrimitiveLog, LogData};

    fn contract_addr() -> Address {
        Address::from_slice(&[0xaa; 20])
    }

    fn make_log(address: Address, topics: Vec<B256>) -> Log {
        let log_data = LogData::new(topics, Bytes::new()).unwrap();
        Log {
            inner: PrimitiveLog {
                address,
                data: log_data,
            },
            block_hash: None,
            block_number: None,
            block_timestamp: None,
            transaction_hash: None,
            transaction_index: None,
            log_index: None,
            removed: false,
        }
    }

    fn transfer_log(address: Address, token_id: u64) -> Log {
        let mut id_topic = B256::ZERO;
        id_topic.0[24..].copy_from_slice(&token_id.to_be_bytes());
        make_log(
            address,
            vec![TRANSFER_EVENT_TOPIC, B256::ZERO, B256::ZERO, id_topic],
        )
    }

    #[test]
    fn test_extract_empty_logs() {
        assert_eq!(extract_minted_token_id(contract_addr(), &[]), None);
    }

    #[test]
    fn test_extract_wrong_address() {
        let other = Address::from_slice(&[0xbb; 20]);
        let logs = vec![transfer_log(other, 7)];
        assert_eq!(extract_minted_token_id(contract_addr(), &logs), None);
    }

    #[test]
    fn test_extract_wrong_topic0() {
        let logs = vec![make_log(
            contract_addr(),
            vec![B256::ZERO, B256::ZERO, B256::ZERO, B256::ZERO],
        )];
        assert_eq!(extract_minted_token_id(contract_addr(), &logs), None);
    }

    #[test]
    fn test_extract_skips_non_transfer_logs() {
        // A non-Transfer log from the contract, then the Transfer with id 7.
        let logs = vec![
            make_log(contract_addr(), vec![B256::ZERO, B256::ZERO]),
            transfer_log(contract_addr(), 7),
        ];
        assert_eq!(
            extract_minted_token_id(contract_addr(), &logs),
            Some("7".to_string())
        );
    }

    #[test]
    fn test_extract_first_match_wins() {
        let logs = vec![
            transfer_log(contract_addr(), 7),
            transfer_log(contract_addr(), 9),
        ];
        assert_eq!(
            extract_minted_token_id(contract_addr(), &logs),
            Some("7".to_string())
        );
    }

    #[test]
    fn test_extract_large_token_id() {
        let logs = vec![transfer_log(contract_addr(), u64::MAX)];
        assert_eq!(
            extract_minted_token_id(contract_addr(), &logs),
            Some(u64::MAX.to_string())
        );
    }

    #[test]
    fn test_extract_match_without_id_topic() {
        // Transfer topic0 but only three topics: no token id to recover.
        let logs = vec![make_log(
            contract_addr(),
            vec![TRANSFER_EVENT_TOPIC, B256::ZERO, B256::ZERO],
        )];
        assert_eq!(extract_minted_token_id(contract_addr(), &logs), None);
    }

    #[test]
    fn test_gas_ceiling_is_flat_pad() {
        // The pad is a flat constant, not a percentage of the estimate.
        assert_eq!(gas_ceiling(0), 100_000);
        assert_eq!(gas_ceiling(21_000), 121_000);
        assert_eq!(gas_ceiling(1_000_000), 1_100_000);
        assert_eq!(gas_ceiling(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_parse_token_id() {
        assert_eq!(parse_token_id("42"), Ok(U256::from(42u64)));
        assert_eq!(parse_token_id("  42  "), Ok(U256::from(42u64)));
        assert_eq!(parse_token_id("0"), Ok(U256::ZERO));
    }

    #[test]
    fn test_parse_token_id_invalid() {
        for input in ["", "abc", "-1", "1.5"] {
            let err = parse_token_id(input).unwrap_err();
            assert_eq!(err.kind, crate::chain::types::ErrorKind::Input);
        }
    }
}
