use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;
use wl_chain_client::wire::{RpcRequest, RpcResponse};
use wl_chain_client::{ChainError, ChainProvider, RpcTransport, WalletConnector};

pub const ENV_RPC_URL: &str = "WHITELIST_RPC_URL";
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// HTTP JSON-RPC provider for nodes that manage their own accounts
/// (local dev nodes, or a node with an unlocked account).
///
/// Reads `WHITELIST_RPC_URL` from environment at construction time
/// (default: `http://localhost:8545`).
pub struct JsonRpcConnector {
    provider: JsonRpcProvider,
}

impl Default for JsonRpcConnector {
    fn default() -> Self {
        Self::new(None)
    }
}

impl JsonRpcConnector {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var(ENV_RPC_URL).ok())
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        Self {
            provider: JsonRpcProvider {
                endpoint: Arc::from(endpoint.trim_end_matches('/')),
                http: reqwest::Client::new(),
                next_id: Arc::new(AtomicU64::new(1)),
            },
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.provider.endpoint
    }
}

#[async_trait(?Send)]
impl WalletConnector for JsonRpcConnector {
    type Provider = JsonRpcProvider;

    async fn connect(&self) -> Result<JsonRpcProvider, ChainError> {
        let accounts = self.provider.accounts().await?;
        if accounts.is_empty() {
            return Err(ChainError::WalletRejection(format!(
                "node at {} exposes no accounts",
                self.provider.endpoint
            )));
        }
        debug!(endpoint = %self.provider.endpoint, accounts = accounts.len(), "connected");
        Ok(self.provider.clone())
    }
}

#[derive(Clone)]
pub struct JsonRpcProvider {
    endpoint: Arc<str>,
    http: reqwest::Client,
    next_id: Arc<AtomicU64>,
}

#[async_trait(?Send)]
impl RpcTransport for JsonRpcProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(id, method, "rpc request");

        let response = self
            .http
            .post(&*self.endpoint)
            .json(&RpcRequest::new(id, method, params))
            .send()
            .await
            .map_err(|e| ChainError::RemoteCallFailure(format!("{method} transport: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChainError::RemoteCallFailure(format!(
                "{method} HTTP {status}: {text}"
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| ChainError::RemoteCallFailure(format!("{method} parse: {e}")))?;

        body.into_result()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

impl JsonRpcProvider {
    /// Number of the latest block, mostly useful as a liveness probe.
    pub async fn block_number(&self) -> Result<u64, ChainError> {
        let value = self.request("eth_blockNumber", json!([])).await?;
        wl_chain_client::wire::parse_quantity_value(&value)
    }
}
