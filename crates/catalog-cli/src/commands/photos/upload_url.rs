//! Photo upload URL command implementation.

use anyhow::Result;
use clap::Args;

use catalog::{ApiResponse, respond};

use crate::backend::Backend;
use crate::output;

#[derive(Args, Debug)]
pub struct UploadUrlArgs {
    /// Content type of the photo (image/jpeg or image/png by default)
    #[arg(long)]
    pub content_type: String,
}

pub async fn run(args: UploadUrlArgs, backend: &Backend) -> Result<()> {
    let result = backend.photos().create_upload_url(&args.content_type).await;

    output::response(&respond(result, |ticket| {
        ApiResponse::success("Pre-signed URL for upload", ticket)
    }))
}
