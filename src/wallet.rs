use std::time::Duration;

use alloy_primitives::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{ClientError, Result};
use crate::provider::{AccountsHandler, TxReceipt, TxRequest, WalletProvider};

const NO_PARAMS: [(); 0] = [];

// EIP-1193 provider injected by MetaMask and compatible wallets
#[derive(Clone, Debug)]
pub struct InjectedProvider {
    ethereum: JsValue,
}

#[derive(Serialize)]
struct RequestArguments<'a, T> {
    method: &'a str,
    params: T,
}

impl InjectedProvider {
    /// Returns the `window.ethereum` provider, if a wallet injected one.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self { ethereum })
    }

    fn method(&self, name: &str) -> std::result::Result<js_sys::Function, String> {
        let value = js_sys::Reflect::get(&self.ethereum, &JsValue::from_str(name))
            .map_err(|_| format!("{} method not found", name))?;
        value
            .dyn_into()
            .map_err(|_| format!("{} is not a function", name))
    }

    async fn request<T: Serialize, R: DeserializeOwned>(&self, method: &str, params: T) -> Result<R> {
        let fail = |message: String| ClientError::Request {
            method: method.to_string(),
            message,
        };

        let args = to_value(&RequestArguments { method, params }).map_err(|e| fail(e.to_string()))?;
        let request_fn = self.method("request").map_err(fail)?;
        let promise: js_sys::Promise = request_fn
            .call1(&self.ethereum, &args)
            .map_err(|e| fail(js_error_to_string(e)))?
            .dyn_into()
            .map_err(|_| fail("request didn't return promise".to_string()))?;
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| fail(js_error_to_string(e)))?;

        from_value(value).map_err(|e| ClientError::Decode(format!("{}: {}", method, e)))
    }
}

impl WalletProvider for InjectedProvider {
    async fn request_accounts(&self) -> Result<Vec<String>> {
        self.request("eth_requestAccounts", NO_PARAMS).await
    }

    async fn call(&self, tx: &TxRequest) -> Result<Bytes> {
        self.request("eth_call", (tx, "latest")).await
    }

    async fn send_transaction(&self, tx: &TxRequest) -> Result<String> {
        self.request("eth_sendTransaction", [tx]).await
    }

    async fn transaction_receipt(&self, hash: &str) -> Result<Option<TxReceipt>> {
        self.request("eth_getTransactionReceipt", [hash]).await
    }

    fn subscribe_accounts_changed(&self, handler: AccountsHandler) -> Result<()> {
        let fail = |message: String| ClientError::Request {
            method: "on(accountsChanged)".to_string(),
            message,
        };
        let on_fn = self.method("on").map_err(fail)?;

        let listener = Closure::<dyn Fn(JsValue)>::new(move |value: JsValue| {
            match from_value::<Vec<String>>(value) {
                Ok(accounts) => handler(accounts),
                Err(e) => log::error!("Unexpected accountsChanged payload: {}", e),
            }
        });
        on_fn
            .call2(
                &self.ethereum,
                &JsValue::from_str("accountsChanged"),
                listener.as_ref().unchecked_ref(),
            )
            .map_err(|e| fail(js_error_to_string(e)))?;
        // the listener stays registered for the whole page session
        listener.forget();
        Ok(())
    }

    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

fn js_error_to_string(e: JsValue) -> String {
    if let Some(s) = e.as_string() {
        return s;
    }
    if let Ok(msg) = js_sys::Reflect::get(&e, &JsValue::from_str("message")) {
        if let Some(s) = msg.as_string() {
            return s;
        }
    }
    if let Ok(s) = js_sys::JSON::stringify(&e) {
        if let Some(s) = s.as_string() {
            return s;
        }
    }
    "request rejected".to_string()
}
