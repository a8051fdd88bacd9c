//! Patch photo command implementation.

use anyhow::Result;
use clap::Args;

use catalog::{ApiResponse, PhotoPatch, RecordId, respond};

use super::MetadataArgs;
use crate::backend::Backend;
use crate::output;

#[derive(Args, Debug)]
pub struct PatchArgs {
    /// Photo identifier
    pub image_id: String,

    /// New file name
    #[arg(long)]
    pub file_name: Option<String>,

    #[command(flatten)]
    pub metadata: MetadataArgs,
}

pub async fn run(args: PatchArgs, backend: &Backend) -> Result<()> {
    let patch = PhotoPatch {
        file_name: args.file_name,
        metadata: args.metadata.into(),
    };

    let result = match RecordId::new(args.image_id) {
        Ok(id) => backend.photos().update(&id, &patch).await,
        Err(err) => Err(err),
    };

    output::response(&respond(result, ApiResponse::from))
}
