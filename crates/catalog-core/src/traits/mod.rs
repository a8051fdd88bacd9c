//! Core traits for store and upload URL behavior.

mod store;
mod upload;

pub use store::{Conditional, RecordStore, ScanOutput, ScanRequest};
pub use upload::UploadUrlProvider;
