//! Typed handle for the deployed CrowdFunding contract.

use std::time::Duration;

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};

use crate::config::ContractConfig;
use crate::error::{ClientError, Result};
use crate::provider::{TxReceipt, TxRequest, WalletProvider};

sol! {
    interface ICrowdFunding {
        function fundRaiser() external view returns (address);
        function getDonatedFund() external view returns (uint256);
        function totalAmountFunded() external view returns (uint256);
        function totalAmountWithdrawn() external view returns (uint256);
        function donateFund() external payable;
        function withdrawFunds(address withdrawee, uint256 amount) external;
    }
}

#[derive(Clone, Debug)]
pub struct CrowdFunding {
    address: Address,
    poll_interval: Duration,
}

impl CrowdFunding {
    pub fn new(config: &ContractConfig) -> Result<Self> {
        Ok(Self {
            address: config.address.parse()?,
            poll_interval: config.poll_interval,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn fund_raiser<P: WalletProvider>(&self, provider: &P) -> Result<Address> {
        self.read(provider, ICrowdFunding::fundRaiserCall {}, None).await
    }

    /// Amount donated by `from`; the contract scopes this to `msg.sender`.
    pub async fn donated_fund<P: WalletProvider>(&self, provider: &P, from: Address) -> Result<U256> {
        self.read(provider, ICrowdFunding::getDonatedFundCall {}, Some(from)).await
    }

    pub async fn total_amount_funded<P: WalletProvider>(&self, provider: &P) -> Result<U256> {
        self.read(provider, ICrowdFunding::totalAmountFundedCall {}, None).await
    }

    pub async fn total_amount_withdrawn<P: WalletProvider>(&self, provider: &P) -> Result<U256> {
        self.read(provider, ICrowdFunding::totalAmountWithdrawnCall {}, None).await
    }

    /// Sends `value` wei to `donateFund()`; returns the tx hash.
    pub async fn donate_fund<P: WalletProvider>(
        &self,
        provider: &P,
        from: Address,
        value: U256,
    ) -> Result<String> {
        let tx = self.transaction(from, ICrowdFunding::donateFundCall {}, value);
        provider.send_transaction(&tx).await
    }

    pub async fn withdraw_funds<P: WalletProvider>(
        &self,
        provider: &P,
        from: Address,
        withdrawee: Address,
        amount: U256,
    ) -> Result<String> {
        let call = ICrowdFunding::withdrawFundsCall { withdrawee, amount };
        let tx = self.transaction(from, call, U256::ZERO);
        provider.send_transaction(&tx).await
    }

    /// Polls for the receipt of `hash` until it is mined. There is no
    /// timeout; a hung wallet keeps the caller suspended.
    pub async fn wait_for_confirmation<P: WalletProvider>(
        &self,
        provider: &P,
        hash: &str,
    ) -> Result<TxReceipt> {
        loop {
            if let Some(receipt) = provider.transaction_receipt(hash).await? {
                if !receipt.succeeded() {
                    return Err(ClientError::Reverted(hash.to_string()));
                }
                log::info!(
                    "Transaction {} mined in block {}",
                    hash,
                    receipt.block_number.as_deref().unwrap_or("pending")
                );
                return Ok(receipt);
            }
            provider.sleep(self.poll_interval).await;
        }
    }

    fn transaction<C: SolCall>(&self, from: Address, call: C, value: U256) -> TxRequest {
        TxRequest {
            from: Some(from),
            to: self.address,
            data: call.abi_encode().into(),
            value,
        }
    }

    async fn read<P: WalletProvider, C: SolCall>(
        &self,
        provider: &P,
        call: C,
        from: Option<Address>,
    ) -> Result<C::Return> {
        let tx = TxRequest {
            from,
            to: self.address,
            data: call.abi_encode().into(),
            value: U256::ZERO,
        };
        let raw = provider.call(&tx).await?;
        C::abi_decode_returns(&raw).map_err(|e| ClientError::Decode(format!("{}: {}", C::SIGNATURE, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_json_abi::{JsonAbi, StateMutability};

    const ARTIFACT: &str = include_str!("../assets/CrowdFunding.json");

    fn bundled_abi() -> JsonAbi {
        let artifact: serde_json::Value = serde_json::from_str(ARTIFACT).unwrap();
        serde_json::from_value(artifact["abi"].clone()).unwrap()
    }

    #[test]
    fn interface_matches_bundled_artifact() {
        let abi = bundled_abi();
        let selector = |name: &str| abi.function(name).unwrap()[0].selector().0;

        assert_eq!(selector("fundRaiser"), ICrowdFunding::fundRaiserCall::SELECTOR);
        assert_eq!(selector("getDonatedFund"), ICrowdFunding::getDonatedFundCall::SELECTOR);
        assert_eq!(selector("totalAmountFunded"), ICrowdFunding::totalAmountFundedCall::SELECTOR);
        assert_eq!(selector("totalAmountWithdrawn"), ICrowdFunding::totalAmountWithdrawnCall::SELECTOR);
        assert_eq!(selector("donateFund"), ICrowdFunding::donateFundCall::SELECTOR);
        assert_eq!(selector("withdrawFunds"), ICrowdFunding::withdrawFundsCall::SELECTOR);

        assert_eq!(
            abi.function("donateFund").unwrap()[0].state_mutability,
            StateMutability::Payable
        );
        assert_eq!(ICrowdFunding::withdrawFundsCall::SIGNATURE, "withdrawFunds(address,uint256)");
    }

    #[test]
    fn encodes_withdraw_arguments_as_words() {
        let to: Address = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".parse().unwrap();
        let data = ICrowdFunding::withdrawFundsCall { withdrawee: to, amount: U256::from(250u64) }.abi_encode();
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(data[..4], ICrowdFunding::withdrawFundsCall::SELECTOR);
        assert!(data[4..16].iter().all(|b| *b == 0));
        assert_eq!(&data[16..36], to.as_slice());
        assert_eq!(data[67], 250);
    }

    #[test]
    fn decodes_full_width_uint256_returns() {
        let word = [0xffu8; 32];
        let total = ICrowdFunding::totalAmountFundedCall::abi_decode_returns(&word).unwrap();
        assert_eq!(total, U256::MAX);
        assert!(ICrowdFunding::fundRaiserCall::abi_decode_returns(&[0u8; 8]).is_err());
    }
}
