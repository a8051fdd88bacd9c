//! Catalog configuration.
//!
//! Every table name, bucket, CDN base and limit the services need lives in
//! one immutable [`CatalogConfig`] built at startup and handed to each
//! service. All fields have defaults, so a partial JSON document is enough.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};

/// Table names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableNames {
    pub photos: String,
    pub profile: String,
    pub visitors: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            photos: "tbl_photo".to_string(),
            profile: "tbl_profile".to_string(),
            visitors: "tbl_visitor".to_string(),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogConfig {
    pub tables: TableNames,

    /// Bucket photo uploads land in.
    pub photos_bucket: String,

    /// Bucket for profile assets (selfie, resume).
    pub assets_bucket: String,

    /// CDN base URL photos are served from; the image id is appended.
    pub photos_cdn: String,

    /// CDN base URL profile assets are served from.
    pub assets_cdn: String,

    /// AWS region for remote backends.
    pub region: String,

    /// Lifetime of photo upload URLs, in seconds.
    pub photo_upload_ttl_secs: u64,

    /// Lifetime of profile asset upload URLs, in seconds.
    pub asset_upload_ttl_secs: u64,

    /// Accepted photo content types and the extension each maps to.
    pub image_types: BTreeMap<String, String>,

    /// Accepted selfie content types.
    pub selfie_types: Vec<String>,

    /// Object key of the selfie in the assets bucket.
    pub selfie_key: String,

    /// Object key of the resume in the assets bucket.
    pub resume_key: String,

    pub default_page_size: u32,
    pub max_page_size: u32,

    /// Site messages longer than this many characters are truncated.
    pub max_message_length: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let image_types = [("image/jpeg", ".jpg"), ("image/png", ".png")]
            .into_iter()
            .map(|(mime, ext)| (mime.to_string(), ext.to_string()))
            .collect();

        Self {
            tables: TableNames::default(),
            photos_bucket: "photos-jin".to_string(),
            assets_bucket: "generic-jin".to_string(),
            photos_cdn: "https://d3bjrjf10s3vbi.cloudfront.net/".to_string(),
            assets_cdn: "https://d3bjrjf10s3vbi.cloudfront.net/".to_string(),
            region: "us-east-1".to_string(),
            photo_upload_ttl_secs: 120,
            asset_upload_ttl_secs: 300,
            image_types,
            selfie_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            selfie_key: "profile/selfie.jpg".to_string(),
            resume_key: "profile/resume.pdf".to_string(),
            default_page_size: 10,
            max_page_size: 100,
            max_message_length: 1000,
        }
    }
}

impl CatalogConfig {
    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            InvalidInputError::Other {
                message: format!("invalid config {}: {}", path.display(), e),
            }
            .into()
        })
    }

    pub fn photo_upload_ttl(&self) -> Duration {
        Duration::from_secs(self.photo_upload_ttl_secs)
    }

    pub fn asset_upload_ttl(&self) -> Duration {
        Duration::from_secs(self.asset_upload_ttl_secs)
    }

    /// Clamp a requested page size into `1..=max_page_size`.
    ///
    /// Absent or non-positive sizes fall back to the default page size.
    pub fn page_size(&self, requested: Option<i64>) -> u32 {
        let max = self.max_page_size.max(1);
        match requested {
            Some(n) if n > 0 => n.min(i64::from(max)) as u32,
            _ => self.default_page_size.clamp(1, max),
        }
    }
}
