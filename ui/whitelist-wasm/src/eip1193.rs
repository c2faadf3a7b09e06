//! Injected wallet binding.
//!
//! Talks to the browser wallet through the EIP-1193 `window.ethereum.request`
//! method. Every request returns a promise that may sit behind a wallet popup.

use async_trait::async_trait;
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wl_chain_client::wire::RpcErrorObject;
use wl_chain_client::{Alerter, ChainError, RpcTransport, WalletConnector};

use crate::dom;

/// Connects through `eth_requestAccounts`, which opens the wallet prompt when
/// the page is not yet authorized.
#[derive(Default)]
pub struct InjectedConnector;

#[async_trait(?Send)]
impl WalletConnector for InjectedConnector {
    type Provider = InjectedProvider;

    async fn connect(&self) -> Result<InjectedProvider, ChainError> {
        let provider = InjectedProvider {
            ethereum: injected_ethereum()?,
        };
        provider.request("eth_requestAccounts", json!([])).await?;
        Ok(provider)
    }
}

pub struct InjectedProvider {
    ethereum: JsValue,
}

#[async_trait(?Send)]
impl RpcTransport for InjectedProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        debug!(method, "wallet request");

        let args = json!({ "method": method, "params": params })
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| ChainError::RemoteCallFailure(format!("{method} encode: {e}")))?;

        let request: Function = Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or_else(|| {
                ChainError::WalletRejection("injected provider has no request()".to_owned())
            })?;

        let promise: Promise = request
            .call1(&self.ethereum, &args)
            .map_err(wallet_error)?
            .dyn_into()
            .map_err(|_| ChainError::RemoteCallFailure(format!("{method} did not return a promise")))?;

        let result = JsFuture::from(promise).await.map_err(wallet_error)?;
        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result)
            .map_err(|e| ChainError::RemoteCallFailure(format!("{method} decode: {e}")))
    }

    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

fn injected_ethereum() -> Result<JsValue, ChainError> {
    let window = dom::window().map_err(|_| ChainError::WalletRejection("no window".to_owned()))?;
    let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).unwrap_or(JsValue::UNDEFINED);
    if ethereum.is_undefined() || ethereum.is_null() {
        return Err(ChainError::WalletRejection(
            "no injected wallet found (window.ethereum)".to_owned(),
        ));
    }
    Ok(ethereum)
}

/// Wallets reject with `{ code, message }`; anything else is passed through
/// as a remote failure.
fn wallet_error(err: JsValue) -> ChainError {
    let field = |name: &str| Reflect::get(&err, &JsValue::from_str(name)).ok();
    let code = field("code").and_then(|v| v.as_f64());
    let message = field("message")
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| format!("{err:?}"));

    match code {
        Some(code) => RpcErrorObject {
            code: code as i64,
            message,
            data: None,
        }
        .into(),
        None => ChainError::RemoteCallFailure(message),
    }
}

/// `window.alert`.
#[derive(Default)]
pub struct BrowserAlerter;

impl Alerter for BrowserAlerter {
    fn alert(&self, message: &str) {
        if let Ok(window) = dom::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
