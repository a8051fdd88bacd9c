//! Presigned S3 upload URLs.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::{Client, Config};
use tracing::{debug, instrument};

use catalog_core::Result;
use catalog_core::error::{InvalidInputError, StoreError};
use catalog_core::traits::UploadUrlProvider;

use crate::settings::AwsSettings;

/// Issues presigned `PutObject` URLs.
#[derive(Debug, Clone)]
pub struct S3UploadUrls {
    client: Client,
}

impl S3UploadUrls {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_settings(settings: &AwsSettings) -> Self {
        let mut builder = Config::builder().region(Region::new(settings.region.clone()));

        if let Some((access, secret, token)) = settings.static_credentials() {
            builder =
                builder.credentials_provider(Credentials::new(access, secret, token, None, "catalog"));
        }
        if let Some(timeout) = settings.operation_timeout {
            builder = builder.timeout_config(
                TimeoutConfig::builder().operation_timeout(timeout).build(),
            );
        }
        if let Some(endpoint) = &settings.endpoint_url {
            // Path-style addressing for S3-compatible endpoints.
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl UploadUrlProvider for S3UploadUrls {
    #[instrument(skip(self))]
    async fn generate_upload_url(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String> {
        let presigning = PresigningConfig::expires_in(ttl).map_err(|e| InvalidInputError::Other {
            message: format!("invalid upload URL lifetime: {}", e),
        })?;

        let request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| StoreError::Service {
                message: DisplayErrorContext(e).to_string(),
            })?;

        debug!("Presigned upload URL");
        Ok(request.uri().to_string())
    }
}
