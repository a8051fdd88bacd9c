//! catalog-file - Filesystem-backed record store.

mod store;
mod upload;

pub use store::FileStore;
pub use upload::LocalUploadUrls;
