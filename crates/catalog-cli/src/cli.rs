//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::backend::StoreOptions;
use crate::commands::photos::PhotosCommand;
use crate::commands::profile::ProfileCommand;
use crate::commands::stats::StatsCommand;
use crate::commands::visitors::VisitorsCommand;

/// Photo catalog record store.
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(author, version = env!("CATALOG_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Store URL (file:///path or dynamodb://region)
    #[arg(long, env = "CATALOG_STORE", global = true)]
    pub store: Option<String>,

    /// Endpoint override for DynamoDB and S3
    #[arg(long, env = "CATALOG_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Configuration file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            store: self.store.clone(),
            endpoint: self.endpoint.clone(),
            config: self.config.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Photo records
    Photos(PhotosCommand),

    /// Monthly visit counter
    Visitors(VisitorsCommand),

    /// Profile links, message and assets
    Profile(ProfileCommand),

    /// Table statistics
    Stats(StatsCommand),
}
