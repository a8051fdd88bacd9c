//! Uniform result envelope.
//!
//! Every operation result is reported as `{status, code, message, data,
//! error}` with a fixed code and message per outcome. Listings add
//! `lastKey` and `hasMore`.

use serde::Serialize;
use serde_json::Value;
use tracing::error;

use catalog_core::{Error, Page, Result};

use crate::outcome::{CreateOutcome, DeleteOutcome, UpdateOutcome};

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

const CONDITION_FAILED: &str = "The conditional request failed";

/// The `{status, code, message, data, error}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: &'static str,
    pub code: u16,
    pub message: String,
    pub data: Value,
    pub error: Option<String>,
}

impl ApiResponse {
    /// A 200 response carrying `data`.
    ///
    /// Data that cannot be encoded as JSON yields the internal-error
    /// envelope instead.
    pub fn success(message: impl Into<String>, data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                status: STATUS_SUCCESS,
                code: 200,
                message: message.into(),
                data,
                error: None,
            },
            Err(err) => Self::from_error(&Error::internal(format!(
                "failed to encode response data: {}",
                err
            ))),
        }
    }

    fn failure(code: u16, message: &str, error: String) -> Self {
        Self {
            status: STATUS_ERROR,
            code,
            message: message.to_string(),
            data: Value::Null,
            error: Some(error),
        }
    }

    /// Map an error to its fixed code and message.
    ///
    /// The `error` field carries a short diagnostic; store failures are
    /// summarized rather than echoing backend text.
    pub fn from_error(err: &Error) -> Self {
        let (code, message) = match err {
            Error::InvalidInput(_) => (400, "Invalid request"),
            Error::Store(_) => (503, "Store service error"),
            Error::Internal { .. } => (500, "An unexpected error occurred"),
        };

        if code >= 500 {
            error!(error = %err, "Request failed");
        }

        Self::failure(code, message, err.diagnostic())
    }

    pub fn not_found() -> Self {
        Self::failure(404, "Photo not found", CONDITION_FAILED.to_string())
    }

    pub fn conflict() -> Self {
        Self::failure(409, "Image already exists", CONDITION_FAILED.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Turn a service result into an envelope, mapping `Ok` with `on_ok`.
pub fn respond<T>(result: Result<T>, on_ok: impl FnOnce(T) -> ApiResponse) -> ApiResponse {
    match result {
        Ok(value) => on_ok(value),
        Err(err) => ApiResponse::from_error(&err),
    }
}

impl From<CreateOutcome> for ApiResponse {
    fn from(outcome: CreateOutcome) -> Self {
        match outcome {
            CreateOutcome::Created => ApiResponse::success(
                "S3 image metadata synced successfully in the database",
                Value::Null,
            ),
            CreateOutcome::Conflict => ApiResponse::conflict(),
        }
    }
}

impl From<UpdateOutcome> for ApiResponse {
    fn from(outcome: UpdateOutcome) -> Self {
        match outcome {
            UpdateOutcome::Updated => {
                ApiResponse::success("Photo metadata updated successfully", Value::Null)
            }
            UpdateOutcome::NotFound => ApiResponse::not_found(),
        }
    }
}

impl From<DeleteOutcome> for ApiResponse {
    fn from(outcome: DeleteOutcome) -> Self {
        match outcome {
            DeleteOutcome::Deleted => ApiResponse::success("Photo deleted successfully", Value::Null),
            DeleteOutcome::NotFound => ApiResponse::not_found(),
        }
    }
}

/// Envelope for a listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    #[serde(flatten)]
    pub base: ApiResponse,
    /// Cursor for the next page; empty when there is none.
    pub last_key: String,
    pub has_more: bool,
}

impl PageResponse {
    pub fn from_result(result: Result<Page>) -> Self {
        match result {
            Ok(page) => Self {
                base: ApiResponse::success(
                    "The resource has been fetched and transmitted in the message body.",
                    &page.records,
                ),
                last_key: page.cursor.unwrap_or_default(),
                has_more: page.has_more,
            },
            Err(err) => Self {
                base: ApiResponse::from_error(&err),
                last_key: String::new(),
                has_more: false,
            },
        }
    }
}
