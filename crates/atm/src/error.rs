use alloy_primitives::{Address, TxHash, hex};
use alloy_provider::PendingTransactionError;
use alloy_sol_types::{SolInterface, decode_revert_reason};
use alloy_transport::TransportError;

use crate::contract::Assessment;

/// Errors raised while talking to the wallet provider.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("wallet request `{method}` failed: {source}")]
    Request {
        method: &'static str,
        #[source]
        source: TransportError,
    },
    #[error("the wallet has no accounts to authorize")]
    NoAccounts,
    #[error("user rejected the request")]
    Rejected,
    #[error("account {0} is not managed by this wallet")]
    UnknownAccount(Address),
    #[error("invalid RPC URL `{0}`")]
    InvalidUrl(String),
    #[error("wallet prompt failed: {0}")]
    Prompt(String),
}

/// Errors raised by contract reads, transaction submission and confirmation.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("execution reverted: {0}")]
    Revert(String),
    #[error("transaction {0} reverted on-chain")]
    Reverted(TxHash),
    #[error(transparent)]
    Call(alloy_contract::Error),
    #[error(transparent)]
    Confirmation(#[from] PendingTransactionError),
    #[error("{0}")]
    Other(String),
}

impl From<alloy_contract::Error> for ContractError {
    fn from(err: alloy_contract::Error) -> Self {
        match err.as_revert_data() {
            Some(data) => Self::Revert(decode_revert(&data)),
            None => Self::Call(err),
        }
    }
}

/// Turns revert data into a readable reason.
///
/// Tries the contract's own errors first, then the standard `Error(string)` and `Panic(uint256)`
/// encodings, and finally falls back to the raw hex.
pub fn decode_revert(data: &[u8]) -> String {
    if let Ok(Assessment::AssessmentErrors::InsufficientBalance(err)) =
        Assessment::AssessmentErrors::abi_decode(data)
    {
        return format!(
            "insufficient balance: have {}, requested {}",
            err.balance, err.withdrawAmount
        );
    }
    if data.is_empty() {
        return "no reason given".to_string();
    }
    decode_revert_reason(data).unwrap_or_else(|| hex::encode_prefixed(data))
}

/// Errors returned by [`Session`](crate::Session) actions that are not swallowed.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("a wallet is required to connect")]
    WalletRequired,
    #[error("the wallet did not authorize any account")]
    NoAccount,
    #[error("invalid input {0:?}: expected a non-negative integer")]
    InvalidInput(String),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Contract(#[from] ContractError),
}
