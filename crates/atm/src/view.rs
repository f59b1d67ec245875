//! Text rendering of a session.

use std::fmt;

use alloy_primitives::{Address, U256};

use crate::state::{Phase, SessionState};

pub const TITLE: &str = "Welcome to the ATM!";

/// What the front-end shows for a given state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View {
    /// Nothing probed yet.
    Loading,
    /// No wallet provider was found.
    InstallPrompt,
    /// A wallet is available but no account is connected.
    Connect,
    /// The main panel.
    Panel { account: Address, balance: Option<U256>, input: String },
}

impl View {
    /// Computes the view; never triggers any effect.
    pub fn of(state: &SessionState) -> Self {
        match (state.phase(), state.account) {
            (Phase::Connected, Some(account)) => {
                Self::Panel { account, balance: state.balance, input: state.input.clone() }
            }
            (Phase::Unavailable, _) => Self::InstallPrompt,
            (Phase::Disconnected, _) => Self::Connect,
            _ => Self::Loading,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        match self {
            Self::Loading => write!(f, "Looking for a wallet..."),
            Self::InstallPrompt => write!(f, "Please install a wallet to use this ATM."),
            Self::Connect => write!(f, "Please connect your wallet."),
            Self::Panel { account, balance, input } => {
                writeln!(f, "Your Account: {account}")?;
                match balance {
                    Some(balance) => writeln!(f, "Your Balance: {balance}")?,
                    None => writeln!(f, "Your Balance: -")?,
                }
                write!(f, "Input: {input:?}")
            }
        }
    }
}
