//! Scripted in-memory chain and wallet used by the controller tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;
use wl_api_types::{Address, DEFAULT_CHAIN_ID, WhitelistConfig};
use wl_chain_client::wire::{parse_hex_data, to_hex_data, to_quantity};
use wl_chain_client::{Alerter, ChainError, RpcTransport, WalletConnector};

pub const ACCOUNT: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
pub const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

pub struct MockChain {
    pub chain_id: Cell<u64>,
    pub accounts: RefCell<Vec<Address>>,
    pub members: RefCell<HashSet<Address>>,
    pub count: Cell<u64>,
    pub reject_connect: Cell<bool>,
    pub reject_signature: Cell<bool>,
    pub revert: Cell<bool>,
    pub fail_count: Cell<bool>,
    /// Receipt polls fail at the transport level.
    pub fail_receipt: Cell<bool>,
    /// Receipt polls answered with `null` before the transaction is mined.
    pub pending_polls: Cell<u32>,
    /// Yield to the executor before answering `eth_sendTransaction`.
    pub yield_on_send: Cell<bool>,
    pub connects: Cell<u32>,
    log: RefCell<Vec<String>>,
    unmined: RefCell<Vec<Address>>,
}

impl MockChain {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            chain_id: Cell::new(DEFAULT_CHAIN_ID),
            accounts: RefCell::new(vec![ACCOUNT.parse().unwrap()]),
            members: RefCell::default(),
            count: Cell::new(0),
            reject_connect: Cell::new(false),
            reject_signature: Cell::new(false),
            revert: Cell::new(false),
            fail_count: Cell::new(false),
            fail_receipt: Cell::new(false),
            pending_polls: Cell::new(0),
            yield_on_send: Cell::new(false),
            connects: Cell::new(0),
            log: RefCell::default(),
            unmined: RefCell::default(),
        })
    }

    pub fn config() -> WhitelistConfig {
        let mut config = WhitelistConfig::new(CONTRACT.parse().unwrap());
        config.receipt_poll_interval_ms = 1;
        config
    }

    /// Number of logged requests with the given name. Contract calls are
    /// logged by function name, everything else by RPC method.
    pub fn calls(&self, name: &str) -> usize {
        self.log.borrow().iter().filter(|entry| *entry == name).count()
    }

    pub fn contract_calls(&self) -> usize {
        self.calls("numAddressesWhitelisted")
            + self.calls("whitelistedAddresses")
            + self.calls("addAddressToWhitelist")
    }

    fn record(&self, name: &str) {
        self.log.borrow_mut().push(name.to_owned());
    }

    fn eth_call(&self, params: &Value) -> Result<Value, ChainError> {
        let data = parse_hex_data(params[0]["data"].as_str().unwrap_or_default())?;
        let (selector, args) = data.split_at(4.min(data.len()));

        if selector == wl_abi::selector(wl_abi::NUM_ADDRESSES_WHITELISTED) {
            self.record("numAddressesWhitelisted");
            if self.fail_count.get() {
                return Err(ChainError::RemoteCallFailure("rpc error -32603: internal".to_owned()));
            }
            return Ok(json!(to_hex_data(&wl_abi::encode_uint(self.count.get()))));
        }

        if selector == wl_abi::selector(wl_abi::WHITELISTED_ADDRESSES) {
            self.record("whitelistedAddresses");
            let mut bytes = [0_u8; 20];
            bytes.copy_from_slice(&args[12..32]);
            let member = self.members.borrow().contains(&Address(bytes));
            return Ok(json!(to_hex_data(&wl_abi::encode_bool(member))));
        }

        Err(ChainError::RemoteCallFailure("execution reverted".to_owned()))
    }

    fn send_transaction(&self, params: &Value) -> Result<Value, ChainError> {
        self.record("addAddressToWhitelist");
        if self.reject_signature.get() {
            return Err(ChainError::WalletRejection(
                "User denied transaction signature".to_owned(),
            ));
        }
        let from: Address = serde_json::from_value(params[0]["from"].clone())
            .map_err(|e| ChainError::RemoteCallFailure(e.to_string()))?;
        self.unmined.borrow_mut().push(from);
        Ok(json!(format!("0x{:064x}", self.calls("addAddressToWhitelist"))))
    }

    fn receipt(&self, params: &Value) -> Value {
        let remaining = self.pending_polls.get();
        if remaining > 0 {
            self.pending_polls.set(remaining - 1);
            return Value::Null;
        }

        let status = if self.revert.get() {
            "0x0"
        } else {
            for sender in self.unmined.borrow_mut().drain(..) {
                if self.members.borrow_mut().insert(sender) {
                    self.count.set(self.count.get() + 1);
                }
            }
            "0x1"
        };

        json!({
            "transactionHash": params[0],
            "blockNumber": "0x1",
            "status": status,
        })
    }
}

pub struct MockProvider {
    chain: Rc<MockChain>,
}

impl MockProvider {
    pub fn new(chain: Rc<MockChain>) -> Self {
        Self { chain }
    }
}

#[async_trait(?Send)]
impl RpcTransport for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let chain = &self.chain;
        match method {
            "eth_chainId" => {
                chain.record(method);
                Ok(json!(to_quantity(chain.chain_id.get())))
            }
            "eth_accounts" => {
                chain.record(method);
                Ok(json!(chain.accounts.borrow().clone()))
            }
            "eth_call" => chain.eth_call(&params),
            "eth_sendTransaction" => {
                if chain.yield_on_send.get() {
                    tokio::task::yield_now().await;
                }
                chain.send_transaction(&params)
            }
            "eth_getTransactionReceipt" => {
                chain.record(method);
                if chain.fail_receipt.get() {
                    return Err(ChainError::RemoteCallFailure(
                        "eth_getTransactionReceipt transport: connection reset".to_owned(),
                    ));
                }
                Ok(chain.receipt(&params))
            }
            other => Err(ChainError::RemoteCallFailure(format!("unsupported method {other}"))),
        }
    }

    async fn sleep(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }
}

pub struct MockConnector {
    pub chain: Rc<MockChain>,
}

#[async_trait(?Send)]
impl WalletConnector for MockConnector {
    type Provider = MockProvider;

    async fn connect(&self) -> Result<MockProvider, ChainError> {
        self.chain.connects.set(self.chain.connects.get() + 1);
        if self.chain.reject_connect.get() {
            return Err(ChainError::WalletRejection("User rejected the request.".to_owned()));
        }
        Ok(MockProvider::new(self.chain.clone()))
    }
}

#[derive(Default)]
pub struct RecordingAlerter {
    pub messages: RefCell<Vec<String>>,
}

impl Alerter for RecordingAlerter {
    fn alert(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_owned());
    }
}
