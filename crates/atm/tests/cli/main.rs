//! Tests for the `atm` binary.

use snapbox::{cmd::Command, str};

/// No endpoint listens on this port.
const DEAD_RPC: &str = "http://127.0.0.1:1";

fn atm() -> Command {
    Command::new(snapbox::cmd::cargo_bin!("atm"))
        .current_dir(std::env::temp_dir())
        .env_remove("RUST_LOG")
        .env_remove("ATM_DEBUG")
        .env_remove("ATM_PRIVATE_KEY")
        .env_remove("ATM_ETH_RPC_URL")
        .env("ATM_CONFIG", "atm-cli-test-missing.toml")
        .env("NO_COLOR", "1")
}

#[test]
fn print_help() {
    atm().arg("--help").assert().success().stdout_eq(str![[r#"
Deposit to and withdraw from the Assessment ATM contract

Usage: atm[EXE] [OPTIONS] [COMMAND]
...
"#]]);
}

#[test]
fn install_prompt_without_wallet() {
    atm()
        .args(["--rpc-url", DEAD_RPC, "balance"])
        .assert()
        .failure()
        .stdout_eq(str![[r#"
Welcome to the ATM!
Please install a wallet to use this ATM.
...
"#]])
        .stderr_eq(str![[r#"
Error: no wallet provider found at http://127.0.0.1:1
...
"#]]);
}

#[test]
fn interactive_session_without_wallet() {
    atm()
        .args(["--rpc-url", DEAD_RPC])
        .stdin("connect\nquit\n")
        .assert()
        .success()
        .stdout_eq(str![[r#"
Welcome to the ATM!
Please install a wallet to use this ATM.
Type `help` for the list of commands.
Welcome to the ATM!
Please install a wallet to use this ATM.
...
"#]])
        .stderr_eq(str![[r#"
Error: a wallet is required to connect
...
"#]]);
}

#[test]
fn invalid_rpc_url() {
    atm().args(["--rpc-url", "not a url", "balance"]).assert().failure().stderr_eq(str![[r#"
Error: invalid RPC URL `not a url`
...
"#]]);
}

#[test]
fn invalid_demo_value_is_rejected_before_connecting() {
    atm()
        .args(["--rpc-url", DEAD_RPC, "revert-example", "abc"])
        .assert()
        .failure()
        .stdout_eq(str![""])
        .stderr_eq(str![[r#"
Error: invalid input "abc": expected a non-negative integer
...
"#]]);
}

#[test]
fn invalid_demo_input_is_reported_once() {
    let assert =
        atm().args(["--rpc-url", DEAD_RPC]).stdin("revert abc\nquit\n").assert().success();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert_eq!(stderr.matches("invalid input").count(), 1, "{stderr}");
    assert!(stderr.starts_with("Error: invalid input \"abc\""), "{stderr}");
}
