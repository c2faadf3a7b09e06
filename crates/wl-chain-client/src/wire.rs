//! JSON-RPC 2.0 wire types and the hex encodings used on the Ethereum RPC.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wl_api_types::{Address, TxHash};

use crate::ChainError;

/// EIP-1193: the user rejected the request.
pub const USER_REJECTED: i64 = 4001;
/// EIP-1193: the requested account or method has not been authorized.
pub const UNAUTHORIZED: i64 = 4100;

#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    pub fn into_result(self) -> Result<Value, ChainError> {
        match (self.error, self.result) {
            (Some(err), _) => Err(err.into()),
            (None, Some(result)) => Ok(result),
            (None, None) => Ok(Value::Null),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<RpcErrorObject> for ChainError {
    fn from(err: RpcErrorObject) -> Self {
        match err.code {
            USER_REJECTED | UNAUTHORIZED => ChainError::WalletRejection(err.message),
            code => ChainError::RemoteCallFailure(format!("rpc error {code}: {}", err.message)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: String,
}

impl TransactionRequest {
    pub fn new(from: Address, to: Address, data: &[u8]) -> Self {
        Self {
            from,
            to,
            data: to_hex_data(data),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    #[serde(default)]
    pub block_number: Option<String>,
    /// `0x1` on success, `0x0` when reverted. Absent on pre-Byzantium chains.
    #[serde(default)]
    pub status: Option<String>,
}

impl TxReceipt {
    pub fn succeeded(&self) -> bool {
        match self.status.as_deref() {
            Some(status) => parse_quantity(status).map(|s| s == 1).unwrap_or(false),
            None => true,
        }
    }
}

pub fn to_hex_data(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

pub fn to_quantity(value: u64) -> String {
    format!("0x{value:x}")
}

pub fn parse_hex_data(raw: &str) -> Result<Vec<u8>, ChainError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits).map_err(|e| ChainError::RemoteCallFailure(format!("bad hex data: {e}")))
}

pub fn parse_quantity(raw: &str) -> Result<u64, ChainError> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::RemoteCallFailure(format!("quantity without 0x prefix: {raw}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| ChainError::RemoteCallFailure(format!("bad quantity {raw}: {e}")))
}

pub fn call_params(to: &Address, data: &[u8]) -> Value {
    json!([{ "to": to, "data": to_hex_data(data) }, "latest"])
}

pub fn parse_quantity_value(value: &Value) -> Result<u64, ChainError> {
    parse_quantity(expect_str(value, "quantity")?)
}

pub fn parse_data_value(value: &Value) -> Result<Vec<u8>, ChainError> {
    parse_hex_data(expect_str(value, "data")?)
}

pub fn parse_tx_hash(value: &Value) -> Result<TxHash, ChainError> {
    Ok(TxHash(expect_str(value, "transaction hash")?.to_owned()))
}

pub fn parse_accounts(value: &Value) -> Result<Vec<Address>, ChainError> {
    let entries = value
        .as_array()
        .ok_or_else(|| unexpected("account list", value))?;
    entries
        .iter()
        .map(|entry| {
            expect_str(entry, "account")?
                .parse::<Address>()
                .map_err(|e| ChainError::RemoteCallFailure(e.to_string()))
        })
        .collect()
}

pub fn parse_receipt(value: Value) -> Result<Option<TxReceipt>, ChainError> {
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ChainError::RemoteCallFailure(format!("bad receipt: {e}")))
}

fn expect_str<'v>(value: &'v Value, what: &str) -> Result<&'v str, ChainError> {
    value.as_str().ok_or_else(|| unexpected(what, value))
}

fn unexpected(what: &str, value: &Value) -> ChainError {
    ChainError::RemoteCallFailure(format!("expected {what}, got {value}"))
}
