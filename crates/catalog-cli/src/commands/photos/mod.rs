//! Photo subcommand implementations.

mod create;
mod delete;
mod list;
mod patch;
mod upload_url;

use anyhow::Result;
use clap::{Args, Subcommand};

use catalog::PhotoMetadata;

use crate::backend::Backend;

#[derive(Args, Debug)]
pub struct PhotosCommand {
    #[command(subcommand)]
    pub command: PhotosSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PhotosSubcommand {
    /// List non-deleted photos, one page at a time
    List(list::ListArgs),

    /// Issue an upload URL for a new photo
    UploadUrl(upload_url::UploadUrlArgs),

    /// Register an uploaded photo
    Create(create::CreateArgs),

    /// Update metadata of an existing photo
    Patch(patch::PatchArgs),

    /// Soft-delete a photo
    Delete(delete::DeleteArgs),
}

/// Optional descriptive metadata flags.
#[derive(Args, Debug, Default)]
pub struct MetadataArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub camera: Option<String>,

    #[arg(long)]
    pub lens: Option<String>,

    #[arg(long)]
    pub aperture: Option<String>,

    #[arg(long)]
    pub shutter: Option<String>,

    #[arg(long)]
    pub iso: Option<String>,

    #[arg(long)]
    pub focal_length: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub date_taken: Option<String>,
}

impl From<MetadataArgs> for PhotoMetadata {
    fn from(args: MetadataArgs) -> Self {
        PhotoMetadata {
            title: args.title,
            description: args.description,
            camera: args.camera,
            lens: args.lens,
            aperture: args.aperture,
            shutter: args.shutter,
            iso: args.iso,
            focal_length: args.focal_length,
            location: args.location,
            date_taken: args.date_taken,
        }
    }
}

pub async fn handle(cmd: PhotosCommand, backend: &Backend) -> Result<()> {
    match cmd.command {
        PhotosSubcommand::List(args) => list::run(args, backend).await,
        PhotosSubcommand::UploadUrl(args) => upload_url::run(args, backend).await,
        PhotosSubcommand::Create(args) => create::run(args, backend).await,
        PhotosSubcommand::Patch(args) => patch::run(args, backend).await,
        PhotosSubcommand::Delete(args) => delete::run(args, backend).await,
    }
}
