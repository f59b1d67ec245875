use atm::{DEFAULT_AMOUNT, Session, sh_err, sh_println, sh_warn};
use eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cmd::report;

const HELP: &str = "\
Commands:
  connect          connect a wallet account
  balance          refresh the balance
  deposit          deposit one unit
  withdraw         withdraw one unit
  input <text>     set the input field
  revert [text]    call revertExample with the input field, or <text>
  assert [text]    call assertExample with the input field, or <text>
  view             print the page
  help             print this message
  quit             leave the session";

/// A line typed into the interactive session.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Connect,
    Balance,
    Deposit,
    Withdraw,
    Input(String),
    Revert(Option<String>),
    Assert(Option<String>),
    View,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parses a non-empty line.
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let text = (!rest.is_empty()).then(|| rest.to_string());
        match name {
            "connect" | "c" => Self::Connect,
            "balance" | "b" => Self::Balance,
            "deposit" | "d" => Self::Deposit,
            "withdraw" | "w" => Self::Withdraw,
            "input" | "i" => Self::Input(rest.to_string()),
            "revert" => Self::Revert(text),
            "assert" => Self::Assert(text),
            "view" | "v" => Self::View,
            "help" | "h" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Runs the interactive session until `quit` or end of input.
pub async fn run(session: &Session) -> Result<()> {
    sh_println!("{}", session.view());
    sh_println!("Type `help` for the list of commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Help => {
                sh_println!("{HELP}");
                continue;
            }
            Command::Unknown(name) => {
                sh_warn!("unknown command `{name}`, type `help` for the list of commands");
                continue;
            }
            cmd => execute(session, cmd).await,
        }
        sh_println!("{}", session.view());
    }
    Ok(())
}

async fn execute(session: &Session, cmd: Command) {
    match cmd {
        Command::Connect => match session.connect_wallet().await {
            Ok(account) => sh_println!("Connected {account}"),
            Err(err) => sh_err!("{err}"),
        },
        Command::Balance => match session.refresh_balance().await {
            Ok(Some(_)) => {}
            Ok(None) => sh_warn!("connect a wallet first"),
            Err(err) => sh_err!("{err}"),
        },
        Command::Deposit => report(&session.deposit(DEFAULT_AMOUNT).await),
        Command::Withdraw => report(&session.withdraw(DEFAULT_AMOUNT).await),
        Command::Input(text) => session.set_input(text),
        Command::Revert(text) => {
            let input = input_for(session, text);
            report(&session.revert_example(&input).await);
        }
        Command::Assert(text) => {
            let input = input_for(session, text);
            report(&session.assert_example(&input).await);
        }
        Command::View | Command::Help | Command::Quit | Command::Unknown(_) => {}
    }
}

/// Typing text after a demo command fills the input field first.
fn input_for(session: &Session, text: Option<String>) -> String {
    match text {
        Some(text) => {
            session.set_input(text.as_str());
            text
        }
        None => session.state().input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("connect"), Command::Connect);
        assert_eq!(Command::parse("  d "), Command::Deposit);
        assert_eq!(Command::parse("input 42"), Command::Input("42".to_string()));
        assert_eq!(Command::parse("input"), Command::Input(String::new()));
        assert_eq!(Command::parse("revert"), Command::Revert(None));
        assert_eq!(Command::parse("assert  0x2a "), Command::Assert(Some("0x2a".to_string())));
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse("dance now"), Command::Unknown("dance".to_string()));
    }
}
