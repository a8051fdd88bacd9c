//! Create photo command implementation.

use anyhow::Result;
use clap::Args;

use catalog::{ApiResponse, NewPhoto, respond};

use super::MetadataArgs;
use crate::backend::Backend;
use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Identifier returned by `photos upload-url`
    #[arg(long)]
    pub image_id: String,

    /// Original file name
    #[arg(long)]
    pub file_name: String,

    /// Object size in bytes
    #[arg(long)]
    pub size_bytes: String,

    #[command(flatten)]
    pub metadata: MetadataArgs,
}

pub async fn run(args: CreateArgs, backend: &Backend) -> Result<()> {
    let photo = NewPhoto {
        image_id: args.image_id,
        file_name: args.file_name,
        size_bytes: args.size_bytes,
        metadata: args.metadata.into(),
    };

    let result = backend.photos().create(photo).await;
    output::response(&respond(result, ApiResponse::from))
}
