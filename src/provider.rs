//! The wallet capability the client talks to. In the browser this is the
//! injected EIP-1193 object (see `wallet.rs`); tests use `mock.rs`.

use std::rc::Rc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Callback invoked with the new account list after the user switches
/// accounts in the wallet.
pub type AccountsHandler = Rc<dyn Fn(Vec<String>)>;

/// Call or transaction object in the JSON-RPC shape wallets expect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TxRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
    #[serde(skip_serializing_if = "U256::is_zero")]
    pub value: U256,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    /// `0x1` on success, `0x0` when reverted
    #[serde(default)]
    pub status: Option<String>,
}

impl TxReceipt {
    pub fn succeeded(&self) -> bool {
        !matches!(self.status.as_deref(), Some("0x0") | Some("0x00"))
    }
}

#[allow(async_fn_in_trait)]
pub trait WalletProvider {
    /// `eth_requestAccounts`: prompts for access on first use.
    async fn request_accounts(&self) -> Result<Vec<String>>;

    /// `eth_call` against the latest block, returning raw return data.
    async fn call(&self, tx: &TxRequest) -> Result<Bytes>;

    /// `eth_sendTransaction`, returning the transaction hash.
    async fn send_transaction(&self, tx: &TxRequest) -> Result<String>;

    /// `eth_getTransactionReceipt`; `None` while still pending.
    async fn transaction_receipt(&self, hash: &str) -> Result<Option<TxReceipt>>;

    /// Registers `handler` for `accountsChanged`.
    fn subscribe_accounts_changed(&self, handler: AccountsHandler) -> Result<()>;

    /// Waits between receipt lookups, on the runtime that drives this wallet.
    async fn sleep(&self, duration: Duration);
}
