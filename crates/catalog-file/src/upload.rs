//! Local upload URLs for the file-backed catalog.

use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use catalog_core::error::InvalidInputError;
use catalog_core::traits::UploadUrlProvider;
use catalog_core::Result;

/// Issues `file://` upload targets under `<root>/uploads/<bucket>/<key>`.
///
/// The expiry and content type travel as query parameters; nothing enforces
/// them locally.
#[derive(Debug, Clone)]
pub struct LocalUploadUrls {
    root: PathBuf,
}

impl LocalUploadUrls {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let relative = Path::new(bucket).join(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));

        if bucket.is_empty() || key.is_empty() || escapes {
            return Err(InvalidInputError::Other {
                message: format!("invalid object location {}/{}", bucket, key),
            }
            .into());
        }

        Ok(self.root.join("uploads").join(relative))
    }
}

#[async_trait]
impl UploadUrlProvider for LocalUploadUrls {
    #[instrument(skip(self))]
    async fn generate_upload_url(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String> {
        let path = self.object_path(bucket, key)?;

        let mut url = Url::from_file_path(&path).map_err(|_| InvalidInputError::Other {
            message: format!("upload path {} is not absolute", path.display()),
        })?;

        let expires = (SystemTime::now() + ttl)
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        url.query_pairs_mut()
            .append_pair("contentType", content_type)
            .append_pair("expires", &expires.to_string());

        debug!(url = %url, "Issued local upload URL");

        Ok(url.to_string())
    }
}
