use atm::{AtmConfig, DEFAULT_AMOUNT, Phase, Session, parse_number, sh_println};
use eyre::{Result, bail};

use crate::{args::AtmSubcommand, cmd::report};

/// Rejects a non-numeric demo value before any wallet is contacted.
pub fn check_input(cmd: &AtmSubcommand) -> Result<()> {
    if let AtmSubcommand::RevertExample { value } | AtmSubcommand::AssertExample { value } = cmd {
        parse_number(value)?;
    }
    Ok(())
}

/// Connects if needed, runs a single action and prints the resulting view.
pub async fn run(session: &Session, config: &AtmConfig, cmd: AtmSubcommand) -> Result<()> {
    if session.phase() == Phase::Unavailable {
        sh_println!("{}", session.view());
        bail!("no wallet provider found at {}", config.eth_rpc_url);
    }
    if !session.state().is_connected() {
        session.connect_wallet().await?;
    }

    let outcome = match cmd {
        AtmSubcommand::Balance => {
            session.refresh_balance().await?;
            None
        }
        AtmSubcommand::Deposit => Some(session.deposit(DEFAULT_AMOUNT).await),
        AtmSubcommand::Withdraw => Some(session.withdraw(DEFAULT_AMOUNT).await),
        AtmSubcommand::RevertExample { value } => {
            session.set_input(value.as_str());
            Some(session.revert_example(&value).await)
        }
        AtmSubcommand::AssertExample { value } => {
            session.set_input(value.as_str());
            Some(session.assert_example(&value).await)
        }
    };

    match outcome {
        Some(outcome) if !outcome.is_confirmed() => {
            sh_println!("{}", session.view());
            bail!("{outcome}")
        }
        Some(outcome) => report(&outcome),
        None => {}
    }
    sh_println!("{}", session.view());
    Ok(())
}
