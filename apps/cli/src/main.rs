//! # tillbox
//!
//! Barcode inventory and receipt tool. Records live either on this machine
//! (offline mode) or in an account scope (after `tillbox login`); receipts
//! are computed from records and archived locally.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tillbox_core::Notice;

mod commands;
mod config;
mod context;
mod feedback;
mod session;

use commands::Cli;
use config::AppConfig;
use context::AppContext;

#[tokio::main]
async fn main() {
    // RUST_LOG controls verbosity; silent by default so notices stay readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(None);

    let ctx = match AppContext::init(config).await {
        Ok(ctx) => ctx,
        Err(err) => {
            feedback::emit(&Notice::error(format!("{err:#}")));
            process::exit(1);
        }
    };

    if let Err(err) = cli.run(ctx).await {
        feedback::emit(&Notice::error(format!("{err:#}")));
        process::exit(1);
    }
}
