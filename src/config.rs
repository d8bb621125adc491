//! contract deployment and client settings

use std::time::Duration;

/// deployed CrowdFunding contract
pub const CONTRACT_ADDRESS: &str = "0xe2b615796daf05add6a81671922a2329d2fee882";

pub const NO_WALLET_MESSAGE: &str = "Please install a MetaMask wallet to use our bank.";

const DEFAULT_POLL_MS: u64 = 1_500;

#[derive(Clone, Debug, PartialEq)]
pub struct ContractConfig {
    /// contract address, 0x-prefixed hex
    pub address: String,
    /// symbol shown next to amounts
    pub symbol: String,
    /// delay between receipt lookups while waiting for confirmation
    pub poll_interval: Duration,
}

impl Default for ContractConfig {
    fn default() -> Self {
        let poll_ms = option_env!("CROWDFUND_POLL_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_MS);
        Self {
            address: option_env!("CROWDFUND_CONTRACT_ADDRESS")
                .unwrap_or(CONTRACT_ADDRESS)
                .into(),
            symbol: "ETH".into(),
            poll_interval: Duration::from_millis(poll_ms),
        }
    }
}
