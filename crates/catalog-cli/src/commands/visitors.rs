//! Visit counter subcommand implementations.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use catalog::{ApiResponse, PeriodKey, respond};

use crate::backend::Backend;
use crate::output;

#[derive(Args, Debug)]
pub struct VisitorsCommand {
    #[command(subcommand)]
    pub command: VisitorsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum VisitorsSubcommand {
    /// Read this month's count, creating the entry if missing
    Get(PeriodArgs),

    /// Add one visit to this month's count
    Increment(PeriodArgs),
}

#[derive(Args, Debug)]
pub struct PeriodArgs {
    /// Period as YYYY-MM (defaults to the current UTC month)
    #[arg(long)]
    pub period: Option<PeriodKey>,
}

impl PeriodArgs {
    fn period(&self) -> PeriodKey {
        self.period.unwrap_or_else(PeriodKey::current)
    }
}

pub async fn handle(cmd: VisitorsCommand, backend: &Backend) -> Result<()> {
    let counter = backend.visitors();

    let response = match cmd.command {
        VisitorsSubcommand::Get(args) => {
            respond(counter.get_or_init(args.period()).await, |read| {
                let message = if read.initialized {
                    "No existing item was found; a new item has been successfully created."
                } else {
                    "The resource has been fetched and transmitted in the message body."
                };
                ApiResponse::success(message, read)
            })
        }
        VisitorsSubcommand::Increment(args) => {
            respond(counter.increment(args.period()).await, |count| {
                ApiResponse::success(
                    "The resource describing the result of the action is transmitted in the message body.",
                    json!({ "count": count }),
                )
            })
        }
    };

    output::response(&response)
}
