//! Store URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated backing store location.
///
/// Two kinds of store are supported:
///
/// # File URLs
///
/// File URLs (`file:///path/to/store`) select the filesystem-backed store,
/// used for local development and tests.
///
/// # DynamoDB URLs
///
/// DynamoDB URLs (`dynamodb://us-east-1`) select the DynamoDB-backed store in
/// the region named by the host component.
///
/// # Example
///
/// ```
/// use catalog_core::StoreUrl;
///
/// let remote = StoreUrl::new("dynamodb://us-east-1").unwrap();
/// assert_eq!(remote.region(), Some("us-east-1"));
///
/// let local = StoreUrl::new("file:///tmp/catalog").unwrap();
/// assert!(local.is_local());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreUrl(Url);

impl StoreUrl {
    /// Create a new store URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or uses an unsupported scheme.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::StoreUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the URL scheme ("file" or "dynamodb").
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Returns true if this is a filesystem store (file:// URL).
    pub fn is_local(&self) -> bool {
        self.0.scheme() == "file"
    }

    /// Returns true if this is a DynamoDB store.
    pub fn is_dynamodb(&self) -> bool {
        self.0.scheme() == "dynamodb"
    }

    /// Returns the AWS region for DynamoDB URLs.
    pub fn region(&self) -> Option<&str> {
        if self.is_dynamodb() {
            self.0.host_str()
        } else {
            None
        }
    }

    /// Returns the filesystem path for file:// URLs.
    ///
    /// Returns `None` for non-file URLs.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.is_local() {
            self.0.to_file_path().ok()
        } else {
            None
        }
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::StoreUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        match url.scheme() {
            "file" => {
                if url.path().is_empty() || url.path() == "/" {
                    return Err(InvalidInputError::StoreUrl {
                        value: original.to_string(),
                        reason: "file:// URL must have a path".to_string(),
                    }
                    .into());
                }
                Ok(())
            }
            "dynamodb" => {
                if url.host_str().is_none_or(|h| h.is_empty()) {
                    return Err(InvalidInputError::StoreUrl {
                        value: original.to_string(),
                        reason: "dynamodb:// URL must name a region".to_string(),
                    }
                    .into());
                }
                Ok(())
            }
            other => Err(InvalidInputError::StoreUrl {
                value: original.to_string(),
                reason: format!("unsupported scheme '{}' (expected file or dynamodb)", other),
            }
            .into()),
        }
    }
}

impl fmt::Display for StoreUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StoreUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for StoreUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for StoreUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StoreUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for StoreUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
