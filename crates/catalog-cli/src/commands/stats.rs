//! Table statistics subcommands.

use anyhow::Result;
use clap::{Args, Subcommand};

use catalog::{ApiResponse, respond};

use crate::backend::Backend;
use crate::output;

#[derive(Args, Debug)]
pub struct StatsCommand {
    #[command(subcommand)]
    pub command: StatsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum StatsSubcommand {
    /// Number of stored photo records, deleted ones included
    Photos,
}

pub async fn handle(cmd: StatsCommand, backend: &Backend) -> Result<()> {
    let response = match cmd.command {
        StatsSubcommand::Photos => respond(backend.photos().stats().await, |stats| {
            ApiResponse::success(
                "The resource describing the result of the action is transmitted in the message body.",
                stats,
            )
        }),
    };

    output::response(&response)
}
