//! EIP-1193 style wallet provider abstraction.
//!
//! A wallet hands out accounts through two requests:
//! - `eth_accounts`: accounts already authorized for this session, never prompts.
//! - `eth_requestAccounts`: asks the user to authorize an account, may prompt.
//!
//! Once an account is authorized the wallet derives a signer for it and binds the ATM contract.

use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{contract::AtmContract, error::WalletError};

mod authorize;
mod rpc;

pub use authorize::{Authorizer, PresetAuthorizer, PromptAuthorizer};
pub use rpc::RpcWallet;

/// Account requests understood by a [`WalletProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum WalletRequest {
    #[serde(rename = "eth_accounts")]
    Accounts,
    #[serde(rename = "eth_requestAccounts")]
    RequestAccounts,
}

impl WalletRequest {
    /// The JSON-RPC method name.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Accounts => "eth_accounts",
            Self::RequestAccounts => "eth_requestAccounts",
        }
    }

    /// Whether the request may prompt the user.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::RequestAccounts)
    }
}

/// The injected wallet provider.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Performs an account request, returning the authorized accounts.
    async fn request(&self, request: WalletRequest) -> Result<Vec<Address>, WalletError>;

    /// Binds the contract at `address` to a signer for `account`.
    fn bind_contract(
        &self,
        address: Address,
        account: Address,
    ) -> Result<Arc<dyn AtmContract>, WalletError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_serialize_like_eip1193() {
        assert_eq!(
            serde_json::to_string(&WalletRequest::Accounts).unwrap(),
            r#"{"method":"eth_accounts"}"#
        );
        assert_eq!(
            serde_json::to_string(&WalletRequest::RequestAccounts).unwrap(),
            r#"{"method":"eth_requestAccounts"}"#
        );

        let request: WalletRequest =
            serde_json::from_str(r#"{"method":"eth_requestAccounts"}"#).unwrap();
        assert_eq!(request, WalletRequest::RequestAccounts);
        assert!(request.is_interactive());
        assert!(!WalletRequest::Accounts.is_interactive());
    }
}
