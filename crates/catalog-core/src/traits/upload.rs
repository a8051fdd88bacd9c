//! Upload URL trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

/// Issues time-limited URLs a client can upload an object to directly.
#[async_trait]
pub trait UploadUrlProvider: Send + Sync {
    async fn generate_upload_url(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String>;
}
