//! Record identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated record identifier (the primary key of a catalog record).
///
/// Identifiers are non-blank and carry no surrounding whitespace. They are
/// immutable once a record is created.
///
/// # Example
///
/// ```
/// use catalog_core::RecordId;
///
/// let id = RecordId::new("aZ3k9QpL20250630.jpg").unwrap();
/// assert_eq!(id.as_str(), "aZ3k9QpL20250630.jpg");
/// assert!(RecordId::new("   ").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Create a new identifier, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is blank, padded with whitespace or
    /// longer than 1024 bytes.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.trim().is_empty() {
            return Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason: "cannot be blank".to_string(),
            }
            .into());
        }

        if s.trim() != s {
            return Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason: "cannot start or end with whitespace".to_string(),
            }
            .into());
        }

        // DynamoDB caps string key attributes at 1024 bytes.
        if s.len() > 1024 {
            return Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason: "exceeds maximum length of 1024 bytes".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
