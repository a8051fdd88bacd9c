//! catalog-core - Core types and traits for the photo catalog record store.

pub mod config;
pub mod error;
pub mod expr;
pub mod repo;
pub mod timestamp;
pub mod traits;
pub mod types;

pub use config::CatalogConfig;
pub use error::Error;
pub use expr::{Condition, ExpressionAttributes, Update, UpdateAction};
pub use repo::{AttrValue, Item, Page, TableSchema};
pub use traits::{Conditional, RecordStore, ScanOutput, ScanRequest, UploadUrlProvider};
pub use types::{PeriodKey, RecordId, StoreUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
