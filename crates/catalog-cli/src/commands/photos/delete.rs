//! Delete photo command implementation.

use anyhow::Result;
use clap::Args;

use catalog::{ApiResponse, RecordId, respond};

use crate::backend::Backend;
use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Photo identifier
    pub image_id: String,
}

pub async fn run(args: DeleteArgs, backend: &Backend) -> Result<()> {
    let result = match RecordId::new(args.image_id) {
        Ok(id) => backend.photos().soft_delete(&id).await,
        Err(err) => Err(err),
    };

    output::response(&respond(result, ApiResponse::from))
}
