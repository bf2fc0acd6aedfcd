use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uniset_cli::{Config, Session};

fn main() {
    let config = Config::parse();
    init_logging(config.verbose);
    if let Err(e) = Session::new(config).run() {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

/// `--verbose` raises the default filter the same way the env var would;
/// `RUST_LOG` still takes precedence when set.
fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let _ = tracing_subscriber::registry().with(filter).with(subscriber).try_init();
}
