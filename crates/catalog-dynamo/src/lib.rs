//! catalog-dynamo - DynamoDB-backed record store and S3 upload URLs.

mod convert;
mod settings;
mod store;
mod upload;

pub use settings::{AwsSettings, DEFAULT_OPERATION_TIMEOUT};
pub use store::DynamoStore;
pub use upload::S3UploadUrls;
