//! catalog - Photo catalog services over a record store.
//!
//! This crate holds the catalog logic proper: cursor-paginated listing of
//! non-deleted photos, create-exactly-once and update-if-live guarded
//! writes, soft delete, a per-month visit counter, and the singleton
//! profile entry. Services are generic over any
//! [`RecordStore`](catalog_core::RecordStore) and
//! [`UploadUrlProvider`](catalog_core::UploadUrlProvider).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use catalog::{CatalogConfig, PhotoCatalog};
//! use catalog_file::{FileStore, LocalUploadUrls};
//!
//! # async fn example() -> catalog::Result<()> {
//! let config = Arc::new(CatalogConfig::default());
//! let photos = PhotoCatalog::new(
//!     FileStore::new("/var/lib/catalog"),
//!     LocalUploadUrls::new("/var/lib/catalog"),
//!     config,
//! );
//!
//! let page = photos.list(None, Some(20)).await?;
//! println!("{} photos, more: {}", page.records.len(), page.has_more);
//! # Ok(())
//! # }
//! ```

mod counter;
pub mod envelope;
mod mutation;
mod outcome;
pub mod photos;
pub mod profile;

pub use counter::{COUNT, VisitCount, VisitCounter};
pub use envelope::{ApiResponse, PageResponse, respond};
pub use mutation::{PartialUpdate, UPDATED_AT};
pub use outcome::{CreateOutcome, DeleteOutcome, UpdateOutcome};
pub use photos::{NewPhoto, PhotoCatalog, PhotoMetadata, PhotoPatch, PhotoStats, UploadTicket};
pub use profile::{AssetUpload, ProfileService, SavedLinks, SavedMessage, SocialLinks};

pub use catalog_core::{CatalogConfig, Error, Page, PeriodKey, RecordId, Result};
