//! Partial update builder.

use catalog_core::error::InvalidInputError;
use catalog_core::{Result, Update, timestamp};

/// Attribute stamped on every partial update.
pub const UPDATED_AT: &str = "updatedAt";

/// Collects optional string fields into a minimal update.
///
/// Absent and blank values are skipped, kept values are trimmed, and the
/// built update always carries an `updatedAt` timestamp. Field names go
/// through placeholder binding when rendered, so reserved words such as
/// `description` or `location` need no special handling here.
///
/// ```
/// use catalog::PartialUpdate;
///
/// let update = PartialUpdate::new()
///     .field("title", Some("  Dusk  "))
///     .field("camera", Some("   "))
///     .field("lens", None)
///     .build_at("2025-01-01T00:00:00Z")
///     .unwrap();
///
/// let fields: Vec<&str> = update.fields().collect();
/// assert_eq!(fields, ["title", "updatedAt"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialUpdate {
    fields: Vec<(String, String)>,
}

impl PartialUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include `name` if `value` is present and not blank.
    ///
    /// A later value for the same field replaces the earlier one.
    pub fn field(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return self;
        };

        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => self.fields.push((name, value.to_string())),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The qualifying fields and their trimmed values.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Build the update, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error when no field qualifies.
    pub fn build(self) -> Result<Update> {
        self.build_at(&timestamp::now())
    }

    /// Build the update with an explicit `updatedAt` value.
    pub fn build_at(self, updated_at: &str) -> Result<Update> {
        if self.fields.is_empty() {
            return Err(InvalidInputError::Other {
                message: "At least one metadata field must be provided".to_string(),
            }
            .into());
        }

        let update = self
            .fields
            .into_iter()
            .fold(Update::new(), |update, (name, value)| update.set(name, value));

        Ok(update.set(UPDATED_AT, updated_at))
    }
}
