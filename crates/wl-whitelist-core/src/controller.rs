use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};
use wl_api_types::WhitelistConfig;
use wl_chain_client::{Alerter, ChainError, ChainProvider, WalletConnector};

use crate::contract::{AccessMode, Accessor, ContractReader, ContractSigner};
use crate::guard::InFlight;
use crate::state::{Action, SessionState, View};

/// Result of one controller operation. Failures are already logged by the
/// time the caller sees them.
#[derive(Debug)]
pub enum Outcome {
    Completed,
    /// The same operation was already in flight, or the view did not allow it.
    Skipped,
    Failed(ChainError),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

type Listener = Box<dyn Fn(&SessionState)>;

/// Session-scoped controller for the whitelist page.
///
/// Share it behind an `Rc`; every method takes `&self`.
pub struct WhitelistController<C: WalletConnector, A> {
    config: WhitelistConfig,
    connector: C,
    alerter: A,
    connection: RefCell<Option<Rc<C::Provider>>>,
    state: RefCell<SessionState>,
    listeners: RefCell<Vec<Listener>>,
    connecting: InFlight,
    joining: InFlight,
    refreshing: InFlight,
    checking: InFlight,
}

impl<C, A> WhitelistController<C, A>
where
    C: WalletConnector,
    A: Alerter,
{
    pub fn new(config: WhitelistConfig, connector: C, alerter: A) -> Self {
        Self {
            config,
            connector,
            alerter,
            connection: RefCell::new(None),
            state: RefCell::new(SessionState::default()),
            listeners: RefCell::new(Vec::new()),
            connecting: InFlight::default(),
            joining: InFlight::default(),
            refreshing: InFlight::default(),
            checking: InFlight::default(),
        }
    }

    pub fn config(&self) -> &WhitelistConfig {
        &self.config
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn alerter(&self) -> &A {
        &self.alerter
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn view(&self) -> View {
        View::for_state(&self.state.borrow())
    }

    pub fn has_connection(&self) -> bool {
        self.connection.borrow().is_some()
    }

    /// Registers a callback fired after every state change. Callbacks must not
    /// subscribe further listeners.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&SessionState) + 'static,
    {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    fn update<F>(&self, apply: F)
    where
        F: FnOnce(&mut SessionState),
    {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            apply(&mut state);
            *state
        };
        for listener in self.listeners.borrow().iter() {
            listener(&snapshot);
        }
    }

    // ── Connection accessor ──

    /// Connects on first use and reuses the handle for the rest of the session.
    async fn provider(&self) -> Result<Rc<C::Provider>, ChainError> {
        if let Some(provider) = self.connection.borrow().as_ref() {
            return Ok(Rc::clone(provider));
        }

        let provider = Rc::new(self.connector.connect().await?);
        let mut slot = self.connection.borrow_mut();
        // A concurrent connect may have finished first; keep its handle.
        Ok(Rc::clone(slot.get_or_insert(provider)))
    }

    async fn checked_provider(&self) -> Result<Rc<C::Provider>, ChainError> {
        let provider = self.provider().await?;
        let actual = provider.chain_id().await?;
        let expected = self.config.required_chain_id;
        if actual != expected {
            self.alerter.alert(&self.config.network_alert());
            return Err(ChainError::NetworkMismatch { expected, actual });
        }
        Ok(provider)
    }

    pub async fn reader(&self) -> Result<ContractReader<C::Provider>, ChainError> {
        let provider = self.checked_provider().await?;
        Ok(ContractReader::new(provider, self.config.contract_address))
    }

    pub async fn signer(&self) -> Result<ContractSigner<C::Provider>, ChainError> {
        let provider = self.checked_provider().await?;
        let account = provider
            .accounts()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ChainError::WalletRejection("no account connected".to_owned()))?;
        Ok(ContractSigner::new(
            ContractReader::new(provider, self.config.contract_address),
            account,
            Duration::from_millis(self.config.receipt_poll_interval_ms),
        ))
    }

    /// Prompts for a connection if needed and checks the network. Fails with
    /// `NetworkMismatch` (after alerting the user) before any contract call.
    pub async fn accessor(&self, mode: AccessMode) -> Result<Accessor<C::Provider>, ChainError> {
        match mode {
            AccessMode::ReadOnly => self.reader().await.map(Accessor::ReadOnly),
            AccessMode::Signing => self.signer().await.map(Accessor::Signing),
        }
    }

    // ── Operations ──

    /// Connects the wallet, then reads membership and the counter.
    pub async fn connect_wallet(&self) -> Outcome {
        let Some(_guard) = self.connecting.try_acquire() else {
            debug!("connect already in flight");
            return Outcome::Skipped;
        };

        if let Err(err) = self.accessor(AccessMode::ReadOnly).await {
            warn!(error = %err, "connect wallet failed");
            return Outcome::Failed(err);
        }
        self.update(|s| s.wallet_connected = true);
        info!("wallet connected");

        self.check_membership().await;
        self.refresh_whitelist_count().await;
        Outcome::Completed
    }

    /// Submits `addAddressToWhitelist()` for the connected account.
    pub async fn join_whitelist(&self) -> Outcome {
        if self.state.borrow().loading {
            debug!("join ignored while a transaction is pending");
            return Outcome::Skipped;
        }
        let Some(_guard) = self.joining.try_acquire() else {
            debug!("join already in flight");
            return Outcome::Skipped;
        };

        match self.try_join().await {
            Ok(()) => Outcome::Completed,
            Err(err) => {
                warn!(error = %err, "join whitelist failed");
                Outcome::Failed(err)
            }
        }
    }

    async fn try_join(&self) -> Result<(), ChainError> {
        let signer = self.signer().await?;
        let pending = signer.add_address_to_whitelist().await?;
        self.update(|s| s.loading = true);

        let mined = pending.wait().await;
        self.update(|s| s.loading = false);
        let receipt = mined?;
        info!(tx = %receipt.transaction_hash, account = %signer.account(), "joined whitelist");

        // Bypasses the refresh slot so the post-join read always happens.
        match self.try_refresh().await {
            Ok(count) => self.update(|s| s.whitelisted_count = count),
            Err(err) => warn!(error = %err, "refresh after join failed"),
        }
        self.update(|s| s.joined_whitelist = true);
        Ok(())
    }

    /// Reads `numAddressesWhitelisted()`; keeps the old count on failure.
    pub async fn refresh_whitelist_count(&self) -> Outcome {
        let Some(_guard) = self.refreshing.try_acquire() else {
            return Outcome::Skipped;
        };

        match self.try_refresh().await {
            Ok(count) => {
                self.update(|s| s.whitelisted_count = count);
                Outcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "refresh whitelist count failed");
                Outcome::Failed(err)
            }
        }
    }

    async fn try_refresh(&self) -> Result<u64, ChainError> {
        self.reader().await?.num_addresses_whitelisted().await
    }

    /// Reads `whitelistedAddresses(account)` for the connected account.
    pub async fn check_membership(&self) -> Outcome {
        let Some(_guard) = self.checking.try_acquire() else {
            return Outcome::Skipped;
        };

        match self.try_check().await {
            Ok(joined) => {
                self.update(|s| s.joined_whitelist = joined);
                Outcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "membership check failed");
                Outcome::Failed(err)
            }
        }
    }

    async fn try_check(&self) -> Result<bool, ChainError> {
        let signer = self.signer().await?;
        let joined = signer.reader().is_whitelisted(signer.account()).await?;
        debug!(
            account = %wl_abi::to_checksum_address(signer.account()),
            joined,
            "membership checked"
        );
        Ok(joined)
    }

    /// Runs whatever the button currently offers.
    pub async fn activate(&self) -> Outcome {
        match self.view().action() {
            Some(Action::Join) => self.join_whitelist().await,
            Some(Action::Connect) => self.connect_wallet().await,
            None => Outcome::Skipped,
        }
    }
}
