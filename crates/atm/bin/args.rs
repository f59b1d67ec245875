use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use atm::shell::ColorChoice;
use clap::{Parser, Subcommand};
use figment::{
    Metadata, Profile,
    value::{Dict, Map},
};

/// Deposit to and withdraw from the Assessment ATM contract.
#[derive(Debug, Parser)]
#[command(name = "atm", version, next_display_order = None)]
pub struct AtmArgs {
    #[command(flatten)]
    pub rpc: RpcOpts,

    #[command(flatten)]
    pub wallet: WalletOpts,

    /// Log and output coloring.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Runs a single action instead of the interactive session.
    #[command(subcommand)]
    pub cmd: Option<AtmSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum AtmSubcommand {
    /// Prints the view, including the balance of the connected account.
    #[command(visible_alias = "b")]
    Balance,

    /// Deposits one unit.
    #[command(visible_alias = "d")]
    Deposit,

    /// Withdraws one unit.
    #[command(visible_alias = "w")]
    Withdraw,

    /// Calls `revertExample` with the given value.
    RevertExample {
        /// A non-negative integer, decimal or 0x-prefixed hex.
        value: String,
    },

    /// Calls `assertExample` with the given value.
    AssertExample {
        /// A non-negative integer, decimal or 0x-prefixed hex.
        value: String,
    },
}

/// Connection options. Unset options fall back to the config file and `ATM_*` variables.
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Connection options")]
pub struct RpcOpts {
    /// The JSON-RPC endpoint acting as the wallet provider.
    #[arg(short = 'r', long = "rpc-url", value_name = "URL")]
    pub url: Option<String>,

    /// The address of the ATM contract.
    #[arg(long, value_name = "ADDRESS")]
    pub contract: Option<Address>,

    /// Blocks to wait for before a transaction counts as confirmed.
    #[arg(long, value_name = "BLOCKS")]
    pub confirmations: Option<u64>,
}

impl figment::Provider for RpcOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("RpcOpts")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Map::from([(Profile::Default, self.dict())]))
    }
}

impl RpcOpts {
    pub fn dict(&self) -> Dict {
        let mut dict = Dict::new();
        if let Some(url) = &self.url {
            dict.insert("eth_rpc_url".into(), url.clone().into());
        }
        if let Some(contract) = self.contract {
            dict.insert("contract_address".into(), contract.to_string().into());
        }
        if let Some(confirmations) = self.confirmations {
            dict.insert("confirmations".into(), confirmations.into());
        }
        dict
    }
}

#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Wallet options")]
pub struct WalletOpts {
    /// Sign with this private key instead of the node's accounts.
    #[arg(long, env = "ATM_PRIVATE_KEY", hide_env_values = true, value_name = "KEY")]
    pub private_key: Option<PrivateKeySigner>,

    /// Authorize this account without prompting.
    #[arg(long, short, value_name = "ADDRESS")]
    pub from: Option<Address>,

    /// Authorize the first available account without prompting.
    #[arg(long, short)]
    pub yes: bool,
}

impl WalletOpts {
    /// Whether account authorization must run without a prompt.
    pub fn non_interactive(&self) -> bool {
        self.yes || self.from.is_some()
    }
}
