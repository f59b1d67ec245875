use std::{fmt, sync::Arc};

use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use super::{Authorizer, WalletProvider, WalletRequest};
use crate::{
    contract::{AlloyAtm, AtmContract},
    error::WalletError,
};

/// Wallet provider backed by an Ethereum JSON-RPC endpoint.
///
/// Accounts come either from the node itself (unlocked dev accounts, transactions go out through
/// `eth_sendTransaction`) or from a local private key that signs every transaction.
pub struct RpcWallet {
    url: Url,
    provider: DynProvider,
    signer: Option<PrivateKeySigner>,
    /// Accounts the user has authorized for this session.
    authorized: Mutex<Vec<Address>>,
    authorizer: Arc<dyn Authorizer>,
    confirmations: u64,
}

impl RpcWallet {
    pub fn new(rpc_url: &str, authorizer: Arc<dyn Authorizer>) -> Result<Self, WalletError> {
        let url = Url::parse(rpc_url).map_err(|_| WalletError::InvalidUrl(rpc_url.to_string()))?;
        let provider = ProviderBuilder::new().connect_http(url.clone()).erased();
        Ok(Self {
            url,
            provider,
            signer: None,
            authorized: Mutex::new(Vec::new()),
            authorizer,
            confirmations: 1,
        })
    }

    /// Signs with a local key instead of the node's accounts.
    pub fn with_signer(mut self, signer: PrivateKeySigner) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Marks accounts as authorized up front, so `eth_accounts` reports them without a prompt.
    pub fn with_authorized(self, accounts: impl IntoIterator<Item = Address>) -> Self {
        self.authorized.lock().extend(accounts);
        self
    }

    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the wallet if the endpoint answers `eth_chainId`, `None` otherwise.
    pub async fn detect(self) -> Option<Self> {
        match self.provider.get_chain_id().await {
            Ok(chain_id) => {
                debug!(url = %self.url, chain_id, "found wallet provider");
                Some(self)
            }
            Err(err) => {
                debug!(url = %self.url, %err, "no wallet provider");
                None
            }
        }
    }

    /// Accounts this wallet can sign for.
    async fn candidates(&self) -> Result<Vec<Address>, WalletError> {
        match &self.signer {
            Some(signer) => Ok(vec![signer.address()]),
            None => self
                .provider
                .get_accounts()
                .await
                .map_err(|source| WalletError::Request { method: "eth_accounts", source }),
        }
    }

    fn authorized_among(&self, candidates: &[Address]) -> Vec<Address> {
        self.authorized.lock().iter().copied().filter(|a| candidates.contains(a)).collect()
    }
}

impl fmt::Debug for RpcWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcWallet")
            .field("url", &self.url.as_str())
            .field("signer", &self.signer.as_ref().map(|s| s.address()))
            .field("authorized", &*self.authorized.lock())
            .field("authorizer", &self.authorizer)
            .field("confirmations", &self.confirmations)
            .finish()
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn request(&self, request: WalletRequest) -> Result<Vec<Address>, WalletError> {
        let candidates = self.candidates().await?;
        let authorized = self.authorized_among(&candidates);
        if request == WalletRequest::Accounts || !authorized.is_empty() {
            return Ok(authorized);
        }
        if candidates.is_empty() {
            return Err(WalletError::NoAccounts);
        }

        let authorizer = Arc::clone(&self.authorizer);
        let account = tokio::task::spawn_blocking(move || authorizer.authorize(&candidates))
            .await
            .map_err(|e| WalletError::Prompt(e.to_string()))??
            .ok_or(WalletError::Rejected)?;
        debug!(%account, "account authorized");
        self.authorized.lock().push(account);
        Ok(vec![account])
    }

    fn bind_contract(
        &self,
        address: Address,
        account: Address,
    ) -> Result<Arc<dyn AtmContract>, WalletError> {
        let provider = match &self.signer {
            Some(signer) if signer.address() == account => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.clone()))
                .connect_http(self.url.clone())
                .erased(),
            Some(_) => return Err(WalletError::UnknownAccount(account)),
            None => self.provider.clone(),
        };
        let atm = AlloyAtm::new(address, provider, account).with_confirmations(self.confirmations);
        Ok(Arc::new(atm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{contract::DEFAULT_CONTRACT_ADDRESS, wallet::PresetAuthorizer};
    use alloy_primitives::address;

    // First dev account of anvil/hardhat.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ACCOUNT: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const OTHER: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

    fn local_wallet() -> RpcWallet {
        let signer: PrivateKeySigner = DEV_KEY.parse().unwrap();
        RpcWallet::new("http://127.0.0.1:8545", Arc::new(PresetAuthorizer(None)))
            .unwrap()
            .with_signer(signer)
    }

    #[test]
    fn rejects_invalid_url() {
        let err = RpcWallet::new("not a url", Arc::new(PresetAuthorizer(None))).unwrap_err();
        assert!(matches!(err, WalletError::InvalidUrl(url) if url == "not a url"));
    }

    #[tokio::test]
    async fn detect_unreachable_endpoint() {
        let wallet =
            RpcWallet::new("http://127.0.0.1:1", Arc::new(PresetAuthorizer(None))).unwrap();
        assert!(wallet.detect().await.is_none());
    }

    #[tokio::test]
    async fn eth_accounts_only_reports_authorized() {
        let wallet = local_wallet();
        assert!(wallet.request(WalletRequest::Accounts).await.unwrap().is_empty());

        let wallet = local_wallet().with_authorized([DEV_ACCOUNT, OTHER]);
        assert_eq!(wallet.request(WalletRequest::Accounts).await.unwrap(), vec![DEV_ACCOUNT]);
    }

    #[tokio::test]
    async fn request_accounts_authorizes_once() {
        let wallet = local_wallet();
        let accounts = wallet.request(WalletRequest::RequestAccounts).await.unwrap();
        assert_eq!(accounts, vec![DEV_ACCOUNT]);
        assert_eq!(wallet.request(WalletRequest::Accounts).await.unwrap(), vec![DEV_ACCOUNT]);
    }

    #[tokio::test]
    async fn request_accounts_rejected() {
        #[derive(Debug)]
        struct Decline;
        impl Authorizer for Decline {
            fn authorize(&self, _: &[Address]) -> Result<Option<Address>, WalletError> {
                Ok(None)
            }
        }

        let signer: PrivateKeySigner = DEV_KEY.parse().unwrap();
        let wallet =
            RpcWallet::new("http://127.0.0.1:8545", Arc::new(Decline)).unwrap().with_signer(signer);
        let err = wallet.request(WalletRequest::RequestAccounts).await.unwrap_err();
        assert!(matches!(err, WalletError::Rejected));
        assert!(wallet.request(WalletRequest::Accounts).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn binds_contract_for_signer_account_only() {
        let wallet = local_wallet();
        let atm = wallet.bind_contract(DEFAULT_CONTRACT_ADDRESS, DEV_ACCOUNT).unwrap();
        assert_eq!(atm.address(), DEFAULT_CONTRACT_ADDRESS);

        let err = wallet.bind_contract(DEFAULT_CONTRACT_ADDRESS, OTHER).err().unwrap();
        assert!(matches!(err, WalletError::UnknownAccount(a) if a == OTHER));
    }
}
