use std::sync::Arc;

use atm::{
    ActionOutcome, AtmConfig, Authorizer, PresetAuthorizer, PromptAuthorizer, RpcWallet, Session,
    WalletProvider, sh_err, sh_println, sh_warn,
};
use eyre::Result;

use crate::args::WalletOpts;

pub mod oneshot;
pub mod repl;

/// Looks for the wallet provider and starts a session against the configured contract.
pub async fn open_session(config: &AtmConfig, opts: &WalletOpts) -> Result<Session> {
    let authorizer: Arc<dyn Authorizer> = if opts.non_interactive() {
        Arc::new(PresetAuthorizer(opts.from))
    } else {
        Arc::new(PromptAuthorizer)
    };

    let mut wallet = RpcWallet::new(&config.eth_rpc_url, authorizer)?
        .with_authorized(config.authorized_accounts.iter().copied())
        .with_confirmations(config.confirmations);
    if let Some(signer) = opts.private_key.clone() {
        wallet = wallet.with_signer(signer);
    }
    let injected = wallet.detect().await.map(|w| Arc::new(w) as Arc<dyn WalletProvider>);

    let session = Session::new(config.contract_address);
    session.probe_wallet(injected).await?;
    Ok(session)
}

/// Prints the result of an action.
pub fn report(outcome: &ActionOutcome) {
    match outcome {
        ActionOutcome::Confirmed { .. } => sh_println!("{outcome}"),
        ActionOutcome::Skipped => sh_warn!("{outcome}"),
        ActionOutcome::Invalid(_) | ActionOutcome::Failed(_) => sh_err!("{outcome}"),
    }
}
