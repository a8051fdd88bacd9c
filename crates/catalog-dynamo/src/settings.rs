//! Connection settings shared by the DynamoDB and S3 clients.

use std::env;
use std::time::Duration;

/// Per-operation deadline applied by [`AwsSettings::from_env`].
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Region, optional endpoint override and static credentials.
#[derive(Debug, Clone, Default)]
pub struct AwsSettings {
    pub region: String,
    /// Endpoint override, e.g. a local DynamoDB or an S3-compatible store.
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    /// Deadline for one operation, retries included.
    pub operation_timeout: Option<Duration>,
}

impl AwsSettings {
    /// Settings for a region, credentials taken from the standard
    /// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`
    /// environment variables.
    pub fn from_env(region: impl Into<String>) -> Self {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());

        Self {
            region: region.into(),
            endpoint_url: None,
            access_key_id: var("AWS_ACCESS_KEY_ID"),
            secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
            session_token: var("AWS_SESSION_TOKEN"),
            operation_timeout: Some(DEFAULT_OPERATION_TIMEOUT),
        }
    }

    /// Set the endpoint override.
    pub fn with_endpoint(mut self, endpoint_url: Option<String>) -> Self {
        self.endpoint_url = endpoint_url;
        self
    }

    /// Static credentials, if both halves are present.
    pub(crate) fn static_credentials(&self) -> Option<(String, String, Option<String>)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(access), Some(secret)) => {
                Some((access.clone(), secret.clone(), self.session_token.clone()))
            }
            _ => None,
        }
    }
}
