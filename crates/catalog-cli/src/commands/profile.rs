//! Profile subcommand implementations.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use catalog::{ApiResponse, SocialLinks, respond};

use crate::backend::Backend;
use crate::output;

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Show the social links
    Links,

    /// Save social links; an empty value clears a link
    SaveLinks(SaveLinksArgs),

    /// Show the site message
    Message,

    /// Save the site message
    SaveMessage(SaveMessageArgs),

    /// Show the selfie URL
    Selfie,

    /// Issue an upload URL for the selfie
    SelfieUploadUrl(SelfieUploadUrlArgs),

    /// Show the resume URL
    Resume,

    /// Issue an upload URL for the resume
    ResumeUploadUrl,
}

#[derive(Args, Debug)]
pub struct SaveLinksArgs {
    /// GitHub profile URL
    #[arg(long)]
    pub github: Option<String>,

    /// LinkedIn profile URL
    #[arg(long)]
    pub linkedin: Option<String>,
}

#[derive(Args, Debug)]
pub struct SaveMessageArgs {
    /// Message text
    pub message: String,
}

#[derive(Args, Debug)]
pub struct SelfieUploadUrlArgs {
    /// Content type of the image
    #[arg(long)]
    pub content_type: String,
}

pub async fn handle(cmd: ProfileCommand, backend: &Backend) -> Result<()> {
    let profile = backend.profile();

    let response = match cmd.command {
        ProfileSubcommand::Links => respond(profile.social_links().await, |links| {
            ApiResponse::success("Social links retrieved successfully", links)
        }),
        ProfileSubcommand::SaveLinks(args) => {
            let links = SocialLinks {
                github: args.github,
                linkedin: args.linkedin,
            };
            respond(profile.save_social_links(links).await, |saved| {
                ApiResponse::success("Social links saved successfully", saved)
            })
        }
        ProfileSubcommand::Message => respond(profile.site_message().await, |message| {
            let data = match message {
                Some(message) => json!({ "message": message }),
                None => json!({}),
            };
            ApiResponse::success("Site message retrieved successfully", data)
        }),
        ProfileSubcommand::SaveMessage(args) => {
            respond(profile.save_site_message(&args.message).await, |saved| {
                ApiResponse::success("Site message saved successfully", saved)
            })
        }
        ProfileSubcommand::Selfie => ApiResponse::success(
            "Selfie URL retrieved successfully",
            json!({ "url": profile.selfie_url() }),
        ),
        ProfileSubcommand::SelfieUploadUrl(args) => {
            respond(profile.selfie_upload_url(&args.content_type).await, |upload| {
                ApiResponse::success("Presigned URL generated for selfie upload", upload)
            })
        }
        ProfileSubcommand::Resume => ApiResponse::success(
            "Resume URL retrieved successfully",
            json!({ "url": profile.resume_url() }),
        ),
        ProfileSubcommand::ResumeUploadUrl => respond(profile.resume_upload_url().await, |upload| {
            ApiResponse::success("Presigned URL generated for resume upload", upload)
        }),
    };

    output::response(&response)
}
