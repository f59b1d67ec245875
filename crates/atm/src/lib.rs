//! Front-end for the Assessment ATM contract.
//!
//! A [`Session`] connects a [`WalletProvider`] account to the ATM, tracks the balance and runs
//! the deposit, withdraw and demo actions. What the user sees is a pure function of the session
//! state, see [`View`].

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod contract;
pub mod error;
pub mod handler;
pub mod session;
pub mod shell;
pub mod state;
pub mod utils;
pub mod view;
pub mod wallet;

pub use config::AtmConfig;
pub use contract::{AlloyAtm, AtmCall, AtmContract, DEFAULT_CONTRACT_ADDRESS, Receipt};
pub use error::{ContractError, SessionError, WalletError};
pub use session::{ActionOutcome, DEFAULT_AMOUNT, Session, parse_number};
pub use state::{Phase, SessionEvent, SessionState, WalletStatus};
pub use view::View;
pub use wallet::{
    Authorizer, PresetAuthorizer, PromptAuthorizer, RpcWallet, WalletProvider, WalletRequest,
};
