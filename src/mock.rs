//! In-memory wallet for exercising the client without a browser.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};

use crate::contract::ICrowdFunding;
use crate::error::{ClientError, Result};
use crate::provider::{AccountsHandler, TxReceipt, TxRequest, WalletProvider};

#[derive(Default)]
pub struct MockProvider {
    pub accounts: RefCell<Vec<String>>,
    pub fund_raiser: Address,
    pub donated: U256,
    pub funded: U256,
    pub withdrawn: U256,
    pub reject_transactions: bool,
    pub revert_transactions: bool,
    /// receipt lookups that report the transaction as still pending
    pub pending_polls: Cell<usize>,
    /// contract function name of every `eth_call`, in order
    pub calls: RefCell<Vec<&'static str>>,
    pub sent: RefCell<Vec<TxRequest>>,
    /// every wallet interaction in order: call names, `send`, `receipt`,
    /// `pending`, `sleep`
    pub events: RefCell<Vec<&'static str>>,
    pub account_requests: Cell<usize>,
    pub subscriptions: Cell<usize>,
    pub handler: RefCell<Option<AccountsHandler>>,
}

impl MockProvider {
    pub fn with_account(account: &str) -> Self {
        Self {
            accounts: RefCell::new(vec![account.to_string()]),
            ..Self::default()
        }
    }

    pub fn calls_to(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == name).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len() + self.sent.borrow().len()
    }

    pub fn clear_history(&self) {
        self.calls.borrow_mut().clear();
        self.events.borrow_mut().clear();
    }

    /// Simulates the user switching accounts in the wallet.
    pub fn switch_account(&self, account: &str) {
        *self.accounts.borrow_mut() = vec![account.to_string()];
        if let Some(handler) = self.handler.borrow().as_ref() {
            handler(vec![account.to_string()]);
        }
    }

    fn record(&self, event: &'static str) {
        self.events.borrow_mut().push(event);
    }
}

impl WalletProvider for MockProvider {
    async fn request_accounts(&self) -> Result<Vec<String>> {
        self.account_requests.set(self.account_requests.get() + 1);
        Ok(self.accounts.borrow().clone())
    }

    async fn call(&self, tx: &TxRequest) -> Result<Bytes> {
        let selector = &tx.data[..4];
        let (name, out) = if selector == ICrowdFunding::fundRaiserCall::SELECTOR {
            ("fundRaiser", self.fund_raiser.abi_encode())
        } else if selector == ICrowdFunding::getDonatedFundCall::SELECTOR {
            ("getDonatedFund", self.donated.abi_encode())
        } else if selector == ICrowdFunding::totalAmountFundedCall::SELECTOR {
            ("totalAmountFunded", self.funded.abi_encode())
        } else if selector == ICrowdFunding::totalAmountWithdrawnCall::SELECTOR {
            ("totalAmountWithdrawn", self.withdrawn.abi_encode())
        } else {
            return Err(ClientError::Request {
                method: "eth_call".into(),
                message: "unknown selector".into(),
            });
        };
        self.calls.borrow_mut().push(name);
        self.record(name);
        Ok(out.into())
    }

    async fn send_transaction(&self, tx: &TxRequest) -> Result<String> {
        if self.reject_transactions {
            return Err(ClientError::Request {
                method: "eth_sendTransaction".into(),
                message: "User denied transaction signature.".into(),
            });
        }
        self.sent.borrow_mut().push(tx.clone());
        self.record("send");
        Ok(format!("0x{:064x}", self.sent.borrow().len()))
    }

    async fn transaction_receipt(&self, hash: &str) -> Result<Option<TxReceipt>> {
        let pending = self.pending_polls.get();
        if pending > 0 {
            self.pending_polls.set(pending - 1);
            self.record("pending");
            return Ok(None);
        }
        self.record("receipt");
        Ok(Some(TxReceipt {
            transaction_hash: hash.to_string(),
            block_number: Some("0x1".into()),
            status: Some(if self.revert_transactions { "0x0" } else { "0x1" }.into()),
        }))
    }

    fn subscribe_accounts_changed(&self, handler: AccountsHandler) -> Result<()> {
        self.subscriptions.set(self.subscriptions.get() + 1);
        *self.handler.borrow_mut() = Some(handler);
        Ok(())
    }

    async fn sleep(&self, _duration: Duration) {
        self.record("sleep");
    }
}
