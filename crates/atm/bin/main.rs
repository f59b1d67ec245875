#[macro_use]
extern crate tracing;

use atm::{AtmConfig, handler, utils};
use clap::Parser;
use eyre::Result;

pub mod args;
pub mod cmd;

use args::AtmArgs;

fn main() -> Result<()> {
    handler::install();
    utils::subscriber();
    let args = AtmArgs::parse();
    args.color.apply();
    main_args(args)
}

#[tokio::main]
async fn main_args(args: AtmArgs) -> Result<()> {
    let config = AtmConfig::load_with(args.rpc.clone())?;
    debug!(?config, "loaded config");

    if let Some(cmd) = &args.cmd {
        cmd::oneshot::check_input(cmd)?;
    }
    let session = cmd::open_session(&config, &args.wallet).await?;
    match args.cmd {
        Some(cmd) => cmd::oneshot::run(&session, &config, cmd).await,
        None => cmd::repl::run(&session).await,
    }
}
