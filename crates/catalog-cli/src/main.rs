//! catalog - command-line front end for the photo catalog.
//!
//! A thin wrapper over the `catalog` services. Every command prints the
//! result envelope as JSON and exits non-zero when it reports an error.

mod backend;
mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use backend::Backend;
use cli::{Cli, Commands};
use commands::{photos, profile, stats, visitors};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let backend = Backend::open(&cli.store_options())?;

    match cli.command {
        Commands::Photos(cmd) => photos::handle(cmd, &backend).await,
        Commands::Visitors(cmd) => visitors::handle(cmd, &backend).await,
        Commands::Profile(cmd) => profile::handle(cmd, &backend).await,
        Commands::Stats(cmd) => stats::handle(cmd, &backend).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so stdout carries only the envelope.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
