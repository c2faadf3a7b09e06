//! Read-only and signing accessors for the whitelist contract.

use std::rc::Rc;
use std::time::Duration;
use tracing::debug;
use wl_api_types::{Address, TxHash};
use wl_chain_client::{ChainError, ChainProvider, TransactionRequest, TxReceipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    Signing,
}

pub enum Accessor<P> {
    ReadOnly(ContractReader<P>),
    Signing(ContractSigner<P>),
}

impl<P> Accessor<P> {
    pub fn reader(&self) -> &ContractReader<P> {
        match self {
            Accessor::ReadOnly(reader) => reader,
            Accessor::Signing(signer) => signer.reader(),
        }
    }

    pub fn mode(&self) -> AccessMode {
        match self {
            Accessor::ReadOnly(_) => AccessMode::ReadOnly,
            Accessor::Signing(_) => AccessMode::Signing,
        }
    }
}

pub struct ContractReader<P> {
    provider: Rc<P>,
    contract: Address,
}

impl<P> ContractReader<P> {
    pub fn new(provider: Rc<P>, contract: Address) -> Self {
        Self { provider, contract }
    }

    pub fn contract(&self) -> &Address {
        &self.contract
    }
}

impl<P: ChainProvider> ContractReader<P> {
    /// `numAddressesWhitelisted()`
    pub async fn num_addresses_whitelisted(&self) -> Result<u64, ChainError> {
        let data = self
            .provider
            .call(&self.contract, &wl_abi::encode_num_addresses_whitelisted())
            .await?;
        Ok(wl_abi::decode_uint(&data)?)
    }

    /// `whitelistedAddresses(address)`
    pub async fn is_whitelisted(&self, address: &Address) -> Result<bool, ChainError> {
        let data = self
            .provider
            .call(&self.contract, &wl_abi::encode_whitelisted_addresses(address))
            .await?;
        Ok(wl_abi::decode_bool(&data)?)
    }
}

/// Accessor bound to the connected account.
pub struct ContractSigner<P> {
    reader: ContractReader<P>,
    account: Address,
    poll_interval: Duration,
}

impl<P> ContractSigner<P> {
    pub fn new(reader: ContractReader<P>, account: Address, poll_interval: Duration) -> Self {
        Self {
            reader,
            account,
            poll_interval,
        }
    }

    pub fn account(&self) -> &Address {
        &self.account
    }

    pub fn reader(&self) -> &ContractReader<P> {
        &self.reader
    }
}

impl<P: ChainProvider> ContractSigner<P> {
    /// `addAddressToWhitelist()`. Resolves once the wallet has signed and
    /// broadcast the transaction, not when it is mined.
    pub async fn add_address_to_whitelist(&self) -> Result<PendingTransaction<P>, ChainError> {
        let tx = TransactionRequest::new(
            self.account,
            self.reader.contract,
            &wl_abi::encode_add_address_to_whitelist(),
        );
        let hash = self.reader.provider.send_transaction(&tx).await?;
        debug!(%hash, from = %self.account, "whitelist transaction broadcast");

        Ok(PendingTransaction {
            provider: Rc::clone(&self.reader.provider),
            hash,
            poll_interval: self.poll_interval,
        })
    }
}

pub struct PendingTransaction<P> {
    provider: Rc<P>,
    hash: TxHash,
    poll_interval: Duration,
}

impl<P: ChainProvider> PendingTransaction<P> {
    pub fn hash(&self) -> &TxHash {
        &self.hash
    }

    /// Polls for the receipt until the transaction is included. A reverted
    /// transaction is a `RemoteCallFailure`. Polls forever if it never lands.
    pub async fn wait(self) -> Result<TxReceipt, ChainError> {
        loop {
            if let Some(receipt) = self.provider.transaction_receipt(&self.hash).await? {
                if !receipt.succeeded() {
                    return Err(ChainError::RemoteCallFailure(format!(
                        "transaction {} reverted",
                        self.hash
                    )));
                }
                return Ok(receipt);
            }
            self.provider.sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ACCOUNT, CONTRACT, MockChain, MockProvider};

    fn reader(chain: &Rc<MockChain>) -> ContractReader<MockProvider> {
        ContractReader::new(Rc::new(MockProvider::new(chain.clone())), CONTRACT.parse().unwrap())
    }

    #[tokio::test]
    async fn reader_decodes_counter_and_membership() -> anyhow::Result<()> {
        let chain = MockChain::new();
        chain.count.set(5);
        let member: Address = ACCOUNT.parse()?;
        chain.members.borrow_mut().insert(member);

        let reader = reader(&chain);
        assert_eq!(reader.num_addresses_whitelisted().await?, 5);
        assert!(reader.is_whitelisted(&member).await?);
        assert!(!reader.is_whitelisted(&CONTRACT.parse()?).await?);
        Ok(())
    }

    #[tokio::test]
    async fn pending_transaction_polls_until_mined() -> anyhow::Result<()> {
        let chain = MockChain::new();
        chain.pending_polls.set(3);
        let signer = ContractSigner::new(reader(&chain), ACCOUNT.parse()?, Duration::from_millis(1));

        let pending = signer.add_address_to_whitelist().await?;
        let hash = pending.hash().clone();
        let receipt = pending.wait().await?;

        assert_eq!(receipt.transaction_hash, hash);
        assert_eq!(chain.calls("eth_getTransactionReceipt"), 4);
        assert_eq!(chain.count.get(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn reverted_transaction_is_remote_failure() -> anyhow::Result<()> {
        let chain = MockChain::new();
        chain.revert.set(true);
        let signer = ContractSigner::new(reader(&chain), ACCOUNT.parse()?, Duration::from_millis(1));

        let err = signer
            .add_address_to_whitelist()
            .await?
            .wait()
            .await
            .expect_err("reverted transaction");
        assert!(matches!(err, ChainError::RemoteCallFailure(msg) if msg.contains("reverted")));
        Ok(())
    }

    #[tokio::test]
    async fn accessor_exposes_reader_for_both_modes() -> anyhow::Result<()> {
        let chain = MockChain::new();
        let read_only = Accessor::ReadOnly(reader(&chain));
        let signing = Accessor::Signing(ContractSigner::new(
            reader(&chain),
            ACCOUNT.parse()?,
            Duration::from_millis(1),
        ));

        assert_eq!(read_only.mode(), AccessMode::ReadOnly);
        assert_eq!(signing.mode(), AccessMode::Signing);
        assert_eq!(signing.reader().contract().to_string(), CONTRACT);
        Ok(())
    }
}
