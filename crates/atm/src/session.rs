//! The wallet/contract session controller.

use std::{fmt, sync::Arc};

use alloy_primitives::{Address, U256};
use parking_lot::Mutex;

use crate::{
    contract::{AtmCall, AtmContract, Receipt},
    error::{ContractError, SessionError},
    state::{Phase, SessionEvent, SessionState},
    view::View,
    wallet::{WalletProvider, WalletRequest},
};

/// Amount moved by the deposit and withdraw actions.
pub const DEFAULT_AMOUNT: U256 = U256::from_limbs([1, 0, 0, 0]);

/// Result of a contract-calling action. Failures are reported here, never returned as errors.
#[derive(Debug)]
pub enum ActionOutcome {
    /// The transaction was mined. `balance` holds the refreshed balance for deposits and
    /// withdrawals.
    Confirmed { call: AtmCall, receipt: Receipt, balance: Option<U256> },
    /// No contract handle yet, nothing was submitted.
    Skipped,
    /// The input was rejected before anything was submitted.
    Invalid(SessionError),
    /// Submission or confirmation failed.
    Failed(ContractError),
}

impl ActionOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed { call, receipt, .. } => {
                write!(f, "{call} confirmed in transaction {}", receipt.tx_hash)?;
                if let Some(block) = receipt.block_number {
                    write!(f, " (block {block})")?;
                }
                Ok(())
            }
            Self::Skipped => write!(f, "not connected, nothing to do"),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::Failed(err) => write!(f, "{err}"),
        }
    }
}

/// Owns the session state and the wallet and contract handles.
///
/// Every method takes `&self`: actions may overlap, and the last balance refresh to finish wins.
/// Locks are never held across an await.
pub struct Session {
    contract_address: Address,
    state: Mutex<SessionState>,
    wallet: Mutex<Option<Arc<dyn WalletProvider>>>,
    contract: Mutex<Option<Arc<dyn AtmContract>>>,
}

impl Session {
    /// Creates a fresh session for the ATM deployed at `contract_address`.
    pub fn new(contract_address: Address) -> Self {
        Self {
            contract_address,
            state: Mutex::default(),
            wallet: Mutex::new(None),
            contract: Mutex::new(None),
        }
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase()
    }

    pub fn view(&self) -> View {
        View::of(&self.state.lock())
    }

    /// Records the injected wallet, if any, and picks up an already authorized account.
    ///
    /// A missing wallet or missing account is not an error.
    pub async fn probe_wallet(
        &self,
        injected: Option<Arc<dyn WalletProvider>>,
    ) -> Result<(), SessionError> {
        if let Some(wallet) = injected {
            *self.wallet.lock() = Some(wallet);
            self.apply(SessionEvent::WalletDetected);
        }
        let Some(wallet) = self.wallet() else {
            debug!("no wallet provider injected");
            self.apply(SessionEvent::WalletMissing);
            return Ok(());
        };

        let accounts = match wallet.request(WalletRequest::Accounts).await {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!(%err, "could not list authorized accounts");
                Vec::new()
            }
        };
        match accounts.first() {
            Some(account) => info!(%account, "account already authorized"),
            None => debug!("no authorized account"),
        }
        self.apply(SessionEvent::AccountsChanged(accounts));
        self.bind_on_connect().await
    }

    /// Asks the wallet to authorize an account, then binds the contract to it.
    pub async fn connect_wallet(&self) -> Result<Address, SessionError> {
        let wallet = self.wallet().ok_or(SessionError::WalletRequired)?;
        let accounts = wallet.request(WalletRequest::RequestAccounts).await?;
        self.apply(SessionEvent::AccountsChanged(accounts));
        let account = self.state.lock().account.ok_or(SessionError::NoAccount)?;
        info!(%account, "account connected");

        self.bind_on_connect().await?;
        Ok(account)
    }

    /// Reads the balance from the contract and caches it. `Ok(None)` when not connected.
    pub async fn refresh_balance(&self) -> Result<Option<U256>, ContractError> {
        let Some(contract) = self.contract() else { return Ok(None) };
        let balance = contract.get_balance().await?;
        debug!(%balance, "balance refreshed");
        self.apply(SessionEvent::BalanceRefreshed(balance));
        Ok(Some(balance))
    }

    pub async fn deposit(&self, amount: U256) -> ActionOutcome {
        self.transact(AtmCall::Deposit(amount)).await
    }

    pub async fn withdraw(&self, amount: U256) -> ActionOutcome {
        self.transact(AtmCall::Withdraw(amount)).await
    }

    /// Stores the text of the input field.
    pub fn set_input(&self, text: impl Into<String>) {
        self.apply(SessionEvent::InputChanged(text.into()));
    }

    pub async fn revert_example(&self, input: &str) -> ActionOutcome {
        self.demo(input, AtmCall::RevertExample).await
    }

    pub async fn assert_example(&self, input: &str) -> ActionOutcome {
        self.demo(input, AtmCall::AssertExample).await
    }

    async fn demo(&self, input: &str, call: fn(U256) -> AtmCall) -> ActionOutcome {
        match parse_number(input) {
            Ok(value) => self.transact(call(value)).await,
            Err(err) => {
                debug!(%err, method = call(U256::ZERO).method(), "rejected input");
                ActionOutcome::Invalid(err)
            }
        }
    }

    async fn transact(&self, call: AtmCall) -> ActionOutcome {
        let Some(contract) = self.contract() else {
            debug!(%call, "no contract bound, skipping");
            return ActionOutcome::Skipped;
        };

        let receipt = match submit_and_wait(contract.as_ref(), call).await {
            Ok(receipt) => receipt,
            Err(err) => {
                debug!(%call, %err, "transaction failed");
                return ActionOutcome::Failed(err);
            }
        };
        info!(
            %call,
            tx_hash = %receipt.tx_hash,
            block = ?receipt.block_number,
            "transaction confirmed"
        );

        let balance = if call.moves_funds() {
            self.refresh_balance().await.unwrap_or_else(|err| {
                warn!(%err, "failed to refresh balance");
                None
            })
        } else {
            None
        };
        ActionOutcome::Confirmed { call, receipt, balance }
    }

    /// Runs after the account may have changed. Binds the contract for a connected account and
    /// fetches the balance right after the bind, so a failed bind is retried by the next connect.
    async fn bind_on_connect(&self) -> Result<(), SessionError> {
        let connected = self.state.lock().is_connected();
        if !connected || !self.ensure_contract()? {
            return Ok(());
        }
        if let Err(err) = self.refresh_balance().await {
            warn!(%err, "failed to fetch balance");
        }
        Ok(())
    }

    /// Binds the contract if it is not bound yet. Returns whether this call bound it.
    fn ensure_contract(&self) -> Result<bool, SessionError> {
        let account = self.state.lock().account;
        let (Some(wallet), Some(account)) = (self.wallet(), account) else { return Ok(false) };

        let mut slot = self.contract.lock();
        if slot.is_some() {
            return Ok(false);
        }
        let contract = wallet.bind_contract(self.contract_address, account)?;
        let address = contract.address();
        *slot = Some(contract);
        drop(slot);

        self.apply(SessionEvent::ContractBound(address));
        debug!(%address, %account, "contract bound");
        Ok(true)
    }

    fn apply(&self, event: SessionEvent) {
        let mut state = self.state.lock();
        *state = std::mem::take(&mut *state).reduce(&event);
    }

    fn wallet(&self) -> Option<Arc<dyn WalletProvider>> {
        self.wallet.lock().clone()
    }

    fn contract(&self) -> Option<Arc<dyn AtmContract>> {
        self.contract.lock().clone()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("contract_address", &self.contract_address)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

async fn submit_and_wait(
    contract: &dyn AtmContract,
    call: AtmCall,
) -> Result<Receipt, ContractError> {
    let pending = contract.submit(call).await?;
    debug!(%call, tx_hash = %pending.tx_hash(), "waiting for confirmation");
    pending.wait().await
}

/// Parses the demo input as a non-negative integer, decimal or `0x`-prefixed hex.
pub fn parse_number(input: &str) -> Result<U256, SessionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SessionError::InvalidInput(input.to_string()));
    }
    trimmed.parse::<U256>().map_err(|_| SessionError::InvalidInput(input.to_string()))
}
