//! Session state and its pure transition function.

use alloy_primitives::{Address, U256};

/// Whether a wallet provider was found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WalletStatus {
    /// Not probed yet.
    #[default]
    Unknown,
    Missing,
    Present,
}

/// Where the session is in its lifecycle, derived from [`SessionState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Unknown,
    /// No wallet provider. Terminal.
    Unavailable,
    /// Wallet present, no account authorized yet.
    Disconnected,
    /// An account is authorized. Terminal; there is no disconnect.
    Connected,
}

/// Inputs to [`SessionState::reduce`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    WalletDetected,
    WalletMissing,
    /// Accounts returned by the wallet; only the first one is used.
    AccountsChanged(Vec<Address>),
    /// The contract handle at this address was constructed.
    ContractBound(Address),
    BalanceRefreshed(U256),
    InputChanged(String),
}

/// Plain data view of a session.
///
/// The wallet and contract handles themselves live in [`Session`](crate::Session); `contract`
/// records the bound address and is `Some` exactly when the handle is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub wallet: WalletStatus,
    pub account: Option<Address>,
    pub contract: Option<Address>,
    pub balance: Option<U256>,
    pub input: String,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match (self.wallet, self.account) {
            (_, Some(_)) => Phase::Connected,
            (WalletStatus::Unknown, None) => Phase::Unknown,
            (WalletStatus::Missing, None) => Phase::Unavailable,
            (WalletStatus::Present, None) => Phase::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.phase() == Phase::Connected
    }

    /// Applies `event`, returning the next state.
    ///
    /// Events that would break an invariant leave the state untouched: a contract is never bound
    /// without an account, a balance is never recorded without a contract, and the first recorded
    /// account is kept for the rest of the session.
    pub fn reduce(mut self, event: &SessionEvent) -> Self {
        match event {
            SessionEvent::WalletDetected => self.wallet = WalletStatus::Present,
            SessionEvent::WalletMissing => {
                if self.wallet == WalletStatus::Unknown {
                    self.wallet = WalletStatus::Missing;
                }
            }
            SessionEvent::AccountsChanged(accounts) => {
                if self.account.is_none() {
                    self.account = accounts.first().copied();
                }
            }
            SessionEvent::ContractBound(address) => {
                if self.account.is_some() {
                    self.contract = Some(*address);
                }
            }
            SessionEvent::BalanceRefreshed(balance) => {
                if self.contract.is_some() {
                    self.balance = Some(*balance);
                }
            }
            SessionEvent::InputChanged(input) => self.input.clone_from(input),
        }
        self
    }
}
