//! List photos command implementation.

use anyhow::Result;
use clap::Args;

use catalog::PageResponse;

use crate::backend::Backend;
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Cursor returned as `lastKey` by the previous page
    #[arg(long)]
    pub cursor: Option<String>,

    /// Records to examine per page (default 10, max 100)
    #[arg(long, allow_negative_numbers = true)]
    pub page_size: Option<i64>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ListArgs, backend: &Backend) -> Result<()> {
    let result = backend
        .photos()
        .list(args.cursor.as_deref(), args.page_size)
        .await;

    let response = PageResponse::from_result(result);
    output::envelope(&response, &response.base, args.pretty)
}
