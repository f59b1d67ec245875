//! Configuration.
//!
//! Values are layered, later sources winning:
//! 1. compiled-in defaults
//! 2. `atm.toml` in the working directory, or the file named by `ATM_CONFIG`
//! 3. `ATM_*` environment variables, e.g. `ATM_ETH_RPC_URL`
//! 4. command-line flags, merged in by the caller

use alloy_primitives::Address;
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};

use crate::contract::DEFAULT_CONTRACT_ADDRESS;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmConfig {
    /// JSON-RPC endpoint acting as the wallet provider.
    pub eth_rpc_url: String,
    /// Where the ATM contract is deployed.
    pub contract_address: Address,
    /// Accounts that count as already authorized when the session starts.
    pub authorized_accounts: Vec<Address>,
    /// Blocks to wait for before a transaction counts as confirmed.
    pub confirmations: u64,
}

impl AtmConfig {
    pub const FILE_NAME: &'static str = "atm.toml";

    /// Environment variable overriding the config file path.
    pub const FILE_ENV: &'static str = "ATM_CONFIG";

    pub const ENV_PREFIX: &'static str = "ATM_";

    /// Keys under [`Self::ENV_PREFIX`] that are not configuration values.
    const RESERVED_ENV: &'static [&'static str] = &["config", "private_key", "debug"];

    /// The default figment: defaults, config file, environment.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(Env::var_or(Self::FILE_ENV, Self::FILE_NAME)))
            .merge(Env::prefixed(Self::ENV_PREFIX).ignore(Self::RESERVED_ENV))
    }

    /// Loads the configuration from the default figment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_provider(Self::figment())
    }

    /// Loads the default figment with `overrides` merged on top.
    pub fn load_with<T: Provider>(overrides: T) -> Result<Self, figment::Error> {
        Self::from_provider(Self::figment().merge(overrides))
    }

    pub fn from_provider<T: Provider>(provider: T) -> Result<Self, figment::Error> {
        Figment::from(provider).extract()
    }
}

impl Default for AtmConfig {
    fn default() -> Self {
        Self {
            eth_rpc_url: "http://127.0.0.1:8545".to_string(),
            contract_address: DEFAULT_CONTRACT_ADDRESS,
            authorized_accounts: Vec::new(),
            confirmations: 1,
        }
    }
}

impl Provider for AtmConfig {
    fn metadata(&self) -> Metadata {
        Metadata::named("ATM config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}
