mod cache;
mod cli;
mod commands;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use uniblock_core::Platform;

use crate::cache::FileAccessoryCache;
use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli
        .global
        .config
        .clone()
        .unwrap_or_else(uniblock_config::config_path);
    let settings = uniblock_config::load_settings(Some(&config_path))
        .map_err(|e| CliError::config(e, &config_path))?;

    let mut cache = FileAccessoryCache::open(&settings.cache_path)?;
    let session = Arc::new(uniblock_core::connect(&settings.controller).await?);
    let mut platform = Platform::new(settings.platform, session);

    commands::launch(&mut platform, &mut cache).await?;

    tracing::debug!(command = ?cli.command, "dispatching command");
    commands::dispatch(cli.command, &platform, &cli.global).await
}
