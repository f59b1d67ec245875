use std::fmt;

use alloy_primitives::Address;
use dialoguer::Select;

use crate::error::WalletError;

/// Decides which account, if any, the user authorizes for the session.
///
/// Called from a blocking context, so implementations may prompt on the terminal.
pub trait Authorizer: fmt::Debug + Send + Sync {
    /// Returns `Ok(None)` when the user declines.
    fn authorize(&self, candidates: &[Address]) -> Result<Option<Address>, WalletError>;
}

/// Asks on the terminal which account to connect.
#[derive(Clone, Copy, Debug, Default)]
pub struct PromptAuthorizer;

impl Authorizer for PromptAuthorizer {
    fn authorize(&self, candidates: &[Address]) -> Result<Option<Address>, WalletError> {
        let items = candidates.iter().map(|a| a.to_checksum(None)).collect::<Vec<_>>();
        let selection = Select::new()
            .with_prompt("Connect an account to the ATM (Esc to reject)")
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(|e| WalletError::Prompt(e.to_string()))?;
        Ok(selection.map(|idx| candidates[idx]))
    }
}

/// Authorizes without prompting: the given account, or the first candidate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PresetAuthorizer(pub Option<Address>);

impl Authorizer for PresetAuthorizer {
    fn authorize(&self, candidates: &[Address]) -> Result<Option<Address>, WalletError> {
        match self.0 {
            Some(account) if candidates.contains(&account) => Ok(Some(account)),
            Some(account) => Err(WalletError::UnknownAccount(account)),
            None => Ok(candidates.first().copied()),
        }
    }
}
