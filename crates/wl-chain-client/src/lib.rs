use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;
use wl_abi::AbiError;
use wl_api_types::{Address, TxHash};

pub mod wire;

pub use wire::{TransactionRequest, TxReceipt};

#[derive(Debug, Error)]
pub enum ChainError {
    /// The wallet is on a different chain than the one the contract lives on.
    #[error("wallet is on chain {actual}, expected chain {expected}")]
    NetworkMismatch { expected: u64, actual: u64 },
    /// The user declined a connection or signature request.
    #[error("wallet rejected the request: {0}")]
    WalletRejection(String),
    /// The contract reverted, the RPC failed, or a response could not be decoded.
    #[error("remote call failed: {0}")]
    RemoteCallFailure(String),
}

impl From<AbiError> for ChainError {
    fn from(err: AbiError) -> Self {
        ChainError::RemoteCallFailure(err.to_string())
    }
}

/// Raw EIP-1193 style request channel to a provider.
#[async_trait(?Send)]
pub trait RpcTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError>;

    /// Platform timer, used between receipt polls.
    async fn sleep(&self, duration: Duration);
}

/// Typed provider operations layered over [`RpcTransport`].
#[async_trait(?Send)]
pub trait ChainProvider: RpcTransport {
    async fn chain_id(&self) -> Result<u64, ChainError> {
        let value = self.request("eth_chainId", json!([])).await?;
        wire::parse_quantity_value(&value)
    }

    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        let value = self.request("eth_accounts", json!([])).await?;
        wire::parse_accounts(&value)
    }

    async fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>, ChainError> {
        let value = self.request("eth_call", wire::call_params(to, data)).await?;
        wire::parse_data_value(&value)
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash, ChainError> {
        let value = self.request("eth_sendTransaction", json!([tx])).await?;
        wire::parse_tx_hash(&value)
    }

    async fn transaction_receipt(&self, hash: &TxHash) -> Result<Option<TxReceipt>, ChainError> {
        let value = self
            .request("eth_getTransactionReceipt", json!([hash]))
            .await?;
        wire::parse_receipt(value)
    }
}

impl<T: RpcTransport + ?Sized> ChainProvider for T {}

/// The wallet-injection entry point. `connect` may raise a wallet popup.
#[async_trait(?Send)]
pub trait WalletConnector {
    type Provider: ChainProvider;

    async fn connect(&self) -> Result<Self::Provider, ChainError>;
}

/// User-facing alert channel.
pub trait Alerter {
    fn alert(&self, message: &str);
}
