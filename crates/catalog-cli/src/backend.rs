//! Store and upload backends selected at startup.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use directories::ProjectDirs;
use tracing::debug;

use catalog::{PhotoCatalog, ProfileService, VisitCounter};
use catalog_core::CatalogConfig;
use catalog_core::expr::{Condition, Update};
use catalog_core::repo::{Item, TableSchema};
use catalog_core::traits::{Conditional, RecordStore, ScanOutput, ScanRequest, UploadUrlProvider};
use catalog_core::types::StoreUrl;
use catalog_dynamo::{AwsSettings, DynamoStore, S3UploadUrls};
use catalog_file::{FileStore, LocalUploadUrls};

/// Global options that pick the backend and configuration.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    pub store: Option<String>,
    pub endpoint: Option<String>,
    pub config: Option<PathBuf>,
}

/// Record store wrapper for CLI use.
#[derive(Debug, Clone)]
pub enum CliStore {
    File(FileStore),
    Dynamo(DynamoStore),
}

#[async_trait]
impl RecordStore for CliStore {
    async fn scan(
        &self,
        table: &TableSchema,
        request: ScanRequest,
    ) -> catalog_core::Result<ScanOutput> {
        match self {
            CliStore::File(store) => store.scan(table, request).await,
            CliStore::Dynamo(store) => store.scan(table, request).await,
        }
    }

    async fn item_count(&self, table: &TableSchema) -> catalog_core::Result<u64> {
        match self {
            CliStore::File(store) => store.item_count(table).await,
            CliStore::Dynamo(store) => store.item_count(table).await,
        }
    }

    async fn get_item(
        &self,
        table: &TableSchema,
        key: &Item,
        projection: &[String],
    ) -> catalog_core::Result<Option<Item>> {
        match self {
            CliStore::File(store) => store.get_item(table, key, projection).await,
            CliStore::Dynamo(store) => store.get_item(table, key, projection).await,
        }
    }

    async fn put_item(
        &self,
        table: &TableSchema,
        item: Item,
        condition: Option<&Condition>,
    ) -> catalog_core::Result<Conditional<()>> {
        match self {
            CliStore::File(store) => store.put_item(table, item, condition).await,
            CliStore::Dynamo(store) => store.put_item(table, item, condition).await,
        }
    }

    async fn update_item(
        &self,
        table: &TableSchema,
        key: &Item,
        update: &Update,
        condition: Option<&Condition>,
    ) -> catalog_core::Result<Conditional<Item>> {
        match self {
            CliStore::File(store) => store.update_item(table, key, update, condition).await,
            CliStore::Dynamo(store) => store.update_item(table, key, update, condition).await,
        }
    }
}

/// Upload URL provider wrapper for CLI use.
#[derive(Debug, Clone)]
pub enum CliUploads {
    Local(LocalUploadUrls),
    S3(S3UploadUrls),
}

#[async_trait]
impl UploadUrlProvider for CliUploads {
    async fn generate_upload_url(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> catalog_core::Result<String> {
        match self {
            CliUploads::Local(urls) => {
                urls.generate_upload_url(bucket, key, content_type, ttl)
                    .await
            }
            CliUploads::S3(urls) => {
                urls.generate_upload_url(bucket, key, content_type, ttl)
                    .await
            }
        }
    }
}

/// The store, upload provider and configuration the services run on.
#[derive(Debug)]
pub struct Backend {
    store: CliStore,
    uploads: CliUploads,
    config: Arc<CatalogConfig>,
}

impl Backend {
    pub fn open(options: &StoreOptions) -> Result<Self> {
        let config = Arc::new(load_config(options.config.as_deref())?);

        let (store, uploads) = match &options.store {
            Some(url) => {
                let url = StoreUrl::new(url).context("Invalid store URL")?;
                remote_or_local(&url, options.endpoint.clone())?
            }
            None => {
                let root = default_root()?;
                debug!(root = %root.display(), "Using default local store");
                (
                    CliStore::File(FileStore::new(&root)),
                    CliUploads::Local(LocalUploadUrls::new(&root)),
                )
            }
        };

        Ok(Self {
            store,
            uploads,
            config,
        })
    }

    pub fn photos(&self) -> PhotoCatalog<CliStore, CliUploads> {
        PhotoCatalog::new(
            self.store.clone(),
            self.uploads.clone(),
            Arc::clone(&self.config),
        )
    }

    pub fn visitors(&self) -> VisitCounter<CliStore> {
        VisitCounter::new(self.store.clone(), Arc::clone(&self.config))
    }

    pub fn profile(&self) -> ProfileService<CliStore, CliUploads> {
        ProfileService::new(
            self.store.clone(),
            self.uploads.clone(),
            Arc::clone(&self.config),
        )
    }
}

fn remote_or_local(url: &StoreUrl, endpoint: Option<String>) -> Result<(CliStore, CliUploads)> {
    if url.is_local() {
        let root = url
            .to_file_path()
            .context("Store URL is not a local path")?;
        debug!(root = %root.display(), "Using local store");
        return Ok((
            CliStore::File(FileStore::new(&root)),
            CliUploads::Local(LocalUploadUrls::new(&root)),
        ));
    }

    let region = url.region().context("Store URL has no region")?;
    let settings = AwsSettings::from_env(region).with_endpoint(endpoint);
    debug!(region, endpoint = ?settings.endpoint_url, "Using DynamoDB store");

    Ok((
        CliStore::Dynamo(DynamoStore::from_settings(&settings)),
        CliUploads::S3(S3UploadUrls::from_settings(&settings)),
    ))
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "catalog").context("Could not determine home directory")
}

fn default_root() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Load the explicit config file, else the user config file if present,
/// else defaults.
fn load_config(path: Option<&Path>) -> Result<CatalogConfig> {
    if let Some(path) = path {
        return CatalogConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let Ok(dirs) = project_dirs() else {
        return Ok(CatalogConfig::default());
    };

    let user_config = dirs.config_dir().join("config.json");
    if user_config.exists() {
        debug!(path = %user_config.display(), "Loading user config");
        CatalogConfig::from_file(&user_config)
            .with_context(|| format!("Failed to load config {}", user_config.display()))
    } else {
        Ok(CatalogConfig::default())
    }
}
