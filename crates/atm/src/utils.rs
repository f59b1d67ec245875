use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Initializes a tracing subscriber writing to stderr, filtered by `RUST_LOG`.
///
/// Defaults to warnings and errors, so caught transaction failures are always visible.
pub fn subscriber() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init()
}

fn env_filter() -> EnvFilter {
    EnvFilter::builder().with_default_directive(LevelFilter::WARN.into()).from_env_lossy()
}
