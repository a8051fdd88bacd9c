//! Typed results of guarded writes.

use catalog_core::Conditional;

/// Result of inserting a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// A record with the same identifier already exists.
    Conflict,
}

/// Result of patching a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// The record is absent or soft-deleted.
    NotFound,
}

/// Result of soft-deleting a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The record is absent.
    NotFound,
}

impl<T> From<Conditional<T>> for CreateOutcome {
    fn from(result: Conditional<T>) -> Self {
        match result {
            Conditional::Applied(_) => CreateOutcome::Created,
            Conditional::ConditionFailed => CreateOutcome::Conflict,
        }
    }
}

impl<T> From<Conditional<T>> for UpdateOutcome {
    fn from(result: Conditional<T>) -> Self {
        match result {
            Conditional::Applied(_) => UpdateOutcome::Updated,
            Conditional::ConditionFailed => UpdateOutcome::NotFound,
        }
    }
}

impl<T> From<Conditional<T>> for DeleteOutcome {
    fn from(result: Conditional<T>) -> Self {
        match result {
            Conditional::Applied(_) => DeleteOutcome::Deleted,
            Conditional::ConditionFailed => DeleteOutcome::NotFound,
        }
    }
}
