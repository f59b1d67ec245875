//! Error reports for the `atm` binary.
//!
//! An error is printed as its deduplicated cause chain on one line. Errors the user can fix from
//! the command line get a hint naming the flag or config key to change. With `ATM_DEBUG` set,
//! `color-eyre`'s verbose report is printed instead.

use eyre::EyreHandler;
use itertools::Itertools;
use std::{error::Error, fmt};

use crate::error::{SessionError, WalletError};

struct AtmHandler {
    verbose: Option<Box<dyn EyreHandler>>,
}

impl EyreHandler for AtmHandler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", dedup_chain(error).iter().format(": "))
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(verbose) = &self.verbose {
            return verbose.debug(error, f);
        }
        self.display(error, f)?;
        if let Some(hint) = hint(error) {
            write!(f, "\n\nhint: {hint}")?;
        }
        Ok(())
    }
}

/// Collects the messages of an error and its sources, skipping sources whose message is already
/// part of the previous one.
pub fn dedup_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut messages: Vec<String> = Vec::new();
    let mut next = Some(error);
    while let Some(err) = next {
        let message = err.to_string();
        if !messages.last().is_some_and(|last| last.contains(&message)) {
            messages.push(message);
        }
        next = err.source();
    }
    messages
}

/// Suggests a fix for the first error in the chain that has one.
pub fn hint(error: &(dyn Error + 'static)) -> Option<&'static str> {
    let mut next = Some(error);
    while let Some(err) = next {
        if err.is::<figment::Error>() {
            return Some("check atm.toml and the `ATM_*` environment variables");
        }
        let wallet = match err.downcast_ref::<SessionError>() {
            Some(SessionError::Wallet(wallet)) => Some(wallet),
            Some(SessionError::NoAccount) => {
                return Some("unlock an account on the node, or pass `--private-key`");
            }
            _ => err.downcast_ref::<WalletError>(),
        };
        match wallet {
            Some(WalletError::InvalidUrl(_) | WalletError::Request { .. }) => {
                return Some("set the endpoint with `--rpc-url` or `eth_rpc_url` in atm.toml");
            }
            Some(WalletError::NoAccounts) => {
                return Some("unlock an account on the node, or pass `--private-key`");
            }
            Some(WalletError::Rejected) => {
                return Some("pass `--yes` or `--from <ADDRESS>` to connect without a prompt");
            }
            Some(WalletError::UnknownAccount(_)) => {
                return Some("`--from` must name an account the wallet can sign for");
            }
            Some(WalletError::Prompt(_)) | None => {}
        }
        next = err.source();
    }
    None
}

/// Installs the [`eyre`] report handler and the `color-eyre` panic hook.
pub fn install() {
    let verbose = std::env::var_os("ATM_DEBUG").is_some();
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section("This is a bug in atm, please report it.")
        .display_env_section(verbose)
        .into_hooks();
    panic_hook.install();

    let eyre_hook = eyre_hook.into_eyre_hook();
    let installed = eyre::set_hook(Box::new(move |e| {
        Box::new(AtmHandler { verbose: verbose.then(|| eyre_hook(e)) })
    }));
    if let Err(err) = installed {
        debug!(%err, "eyre hook already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContractError;
    use alloy_primitives::address;

    struct Report<'a>(&'a (dyn Error + 'static));

    impl fmt::Debug for Report<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            AtmHandler { verbose: None }.debug(self.0, f)
        }
    }

    #[test]
    fn transparent_sources_are_collapsed() {
        let err = SessionError::Wallet(WalletError::Rejected);
        assert_eq!(dedup_chain(&err), vec!["user rejected the request".to_string()]);
    }

    #[test]
    fn distinct_sources_are_kept() {
        let err = eyre::eyre!("user rejected the request").wrap_err("failed to connect");
        let chain = dedup_chain(err.as_ref());
        assert_eq!(chain, vec!["failed to connect", "user rejected the request"]);
    }

    #[test]
    fn rejected_connect_suggests_preset_account() {
        let err = SessionError::Wallet(WalletError::Rejected);
        assert_eq!(
            format!("{:?}", Report(&err)),
            "user rejected the request\n\n\
             hint: pass `--yes` or `--from <ADDRESS>` to connect without a prompt"
        );
    }

    #[test]
    fn hints_follow_the_error() {
        let err = WalletError::InvalidUrl("not a url".to_string());
        assert!(hint(&err).is_some_and(|hint| hint.contains("--rpc-url")));

        let err = SessionError::Wallet(WalletError::UnknownAccount(address!(
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        )));
        assert_eq!(hint(&err), Some("`--from` must name an account the wallet can sign for"));

        let err = figment::Error::from("missing field `contract_address`".to_string());
        assert!(hint(&err).is_some_and(|hint| hint.contains("atm.toml")));
    }

    #[test]
    fn contract_failures_have_no_hint() {
        let err = SessionError::Contract(ContractError::Revert("no reason given".to_string()));
        assert_eq!(hint(&err), None);
        assert_eq!(format!("{:?}", Report(&err)), "execution reverted: no reason given");
    }
}
