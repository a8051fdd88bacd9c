//! Singleton profile entry: social links, site message and asset URLs.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use catalog_core::error::InvalidInputError;
use catalog_core::{
    AttrValue, CatalogConfig, Item, RecordStore, Result, TableSchema, Update, UploadUrlProvider,
    timestamp,
};

use crate::mutation::UPDATED_AT;
use crate::photos::allowed_list;

pub const PROFILE_ID: &str = "profileId";
pub const MAIN_PROFILE: &str = "main";
pub const GITHUB: &str = "github";
pub const LINKEDIN: &str = "linkedin";
pub const SITE_MESSAGE: &str = "siteMessage";

const RESUME_CONTENT_TYPE: &str = "application/pdf";
const MAX_LINK_LEN: usize = 255;

/// An empty string or a GitHub profile URL.
static GITHUB_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?github\.com/[a-zA-Z0-9_-]+/?$|^$")
        .expect("valid GitHub URL regex")
});

/// An empty string or a LinkedIn member URL.
static LINKEDIN_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?linkedin\.com/in/[a-zA-Z0-9_-]+/?$|^$")
        .expect("valid LinkedIn URL regex")
});

/// Social link fields. `None` leaves a stored link untouched; an empty
/// string clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// Links as written, with the time they were saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLinks {
    #[serde(flatten)]
    pub links: SocialLinks,
    pub updated_at: String,
}

/// The site message as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMessage {
    pub message: String,
    pub updated_at: String,
}

/// Upload target for a profile asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUpload {
    pub url: String,
    pub key: String,
    pub expires_in_minutes: u64,
}

/// Profile service over the `main` profile entry.
pub struct ProfileService<S, U> {
    store: S,
    uploads: U,
    config: Arc<CatalogConfig>,
    table: TableSchema,
}

impl<S: RecordStore, U: UploadUrlProvider> ProfileService<S, U> {
    pub fn new(store: S, uploads: U, config: Arc<CatalogConfig>) -> Self {
        let table = TableSchema::new(config.tables.profile.clone(), &[PROFILE_ID]);
        Self {
            store,
            uploads,
            config,
            table,
        }
    }

    fn key() -> Item {
        let mut key = Item::new();
        key.insert(PROFILE_ID.to_string(), AttrValue::from(MAIN_PROFILE));
        key
    }

    #[instrument(skip(self))]
    pub async fn social_links(&self) -> Result<SocialLinks> {
        let projection = [GITHUB.to_string(), LINKEDIN.to_string()];
        let item = self
            .store
            .get_item(&self.table, &Self::key(), &projection)
            .await?
            .unwrap_or_default();

        let text = |name: &str| item.get(name).and_then(AttrValue::as_str).map(str::to_string);
        Ok(SocialLinks {
            github: text(GITHUB),
            linkedin: text(LINKEDIN),
        })
    }

    /// Save the provided links.
    ///
    /// At least one link must be non-blank. Each provided link must be empty
    /// or a GitHub / LinkedIn profile URL; provided fields are written as
    /// given, including empty strings.
    #[instrument(skip(self, links))]
    pub async fn save_social_links(&self, links: SocialLinks) -> Result<SavedLinks> {
        let has_link = [&links.github, &links.linkedin]
            .into_iter()
            .flatten()
            .any(|l| !l.trim().is_empty());
        if !has_link {
            return Err(InvalidInputError::Other {
                message: "At least one social link must be provided".to_string(),
            }
            .into());
        }

        if let Some(github) = &links.github {
            validate_link(GITHUB, "GitHub", github, &GITHUB_URL)?;
        }
        if let Some(linkedin) = &links.linkedin {
            validate_link(LINKEDIN, "LinkedIn", linkedin, &LINKEDIN_URL)?;
        }

        let updated_at = timestamp::now();
        let mut update = Update::new().set(UPDATED_AT, updated_at.as_str());
        if let Some(github) = &links.github {
            update = update.set(GITHUB, github.as_str());
        }
        if let Some(linkedin) = &links.linkedin {
            update = update.set(LINKEDIN, linkedin.as_str());
        }

        self.store
            .update_item(&self.table, &Self::key(), &update, None)
            .await?;

        info!("Saved social links");
        Ok(SavedLinks { links, updated_at })
    }

    #[instrument(skip(self))]
    pub async fn site_message(&self) -> Result<Option<String>> {
        let item = self
            .store
            .get_item(&self.table, &Self::key(), &[SITE_MESSAGE.to_string()])
            .await?;

        Ok(item
            .as_ref()
            .and_then(|item| item.get(SITE_MESSAGE))
            .and_then(AttrValue::as_str)
            .map(str::to_string))
    }

    /// Save the site message, trimmed and cut to the configured length.
    #[instrument(skip(self, message))]
    pub async fn save_site_message(&self, message: &str) -> Result<SavedMessage> {
        let message = message.trim();
        if message.is_empty() {
            return Err(InvalidInputError::Other {
                message: "Message cannot be blank".to_string(),
            }
            .into());
        }

        let message: String = message.chars().take(self.config.max_message_length).collect();
        let updated_at = timestamp::now();

        let update = Update::new()
            .set(SITE_MESSAGE, message.as_str())
            .set(UPDATED_AT, updated_at.as_str());
        self.store
            .update_item(&self.table, &Self::key(), &update, None)
            .await?;

        info!(length = message.chars().count(), "Saved site message");
        Ok(SavedMessage {
            message,
            updated_at,
        })
    }

    pub fn selfie_url(&self) -> String {
        format!("{}{}", self.config.assets_cdn, self.config.selfie_key)
    }

    pub fn resume_url(&self) -> String {
        format!("{}{}", self.config.assets_cdn, self.config.resume_key)
    }

    #[instrument(skip(self))]
    pub async fn selfie_upload_url(&self, content_type: &str) -> Result<AssetUpload> {
        if !self.config.selfie_types.iter().any(|t| t == content_type) {
            return Err(InvalidInputError::ContentType {
                value: content_type.to_string(),
                allowed: allowed_list(&self.config.selfie_types),
            }
            .into());
        }

        self.asset_upload(&self.config.selfie_key, content_type).await
    }

    #[instrument(skip(self))]
    pub async fn resume_upload_url(&self) -> Result<AssetUpload> {
        self.asset_upload(&self.config.resume_key, RESUME_CONTENT_TYPE)
            .await
    }

    async fn asset_upload(&self, key: &str, content_type: &str) -> Result<AssetUpload> {
        let ttl = self.config.asset_upload_ttl();
        let url = self
            .uploads
            .generate_upload_url(&self.config.assets_bucket, key, content_type, ttl)
            .await?;

        info!(key, "Generated asset upload URL");
        Ok(AssetUpload {
            url,
            key: key.to_string(),
            expires_in_minutes: ttl.as_secs() / 60,
        })
    }
}

fn validate_link(field: &str, label: &str, value: &str, pattern: &Regex) -> Result<()> {
    if value.chars().count() > MAX_LINK_LEN {
        return Err(InvalidInputError::field(
            field,
            format!("{label} URL must not exceed {MAX_LINK_LEN} characters"),
        )
        .into());
    }
    if !pattern.is_match(value) {
        return Err(InvalidInputError::field(field, format!("Invalid {label} URL format")).into());
    }
    Ok(())
}
