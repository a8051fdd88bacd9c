//! Photo records: paginated listing, upload URLs and guarded writes.

use std::sync::Arc;

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use catalog_core::error::InvalidInputError;
use catalog_core::{
    AttrValue, CatalogConfig, Condition, Item, Page, RecordId, RecordStore, Result, ScanRequest,
    TableSchema, Update, UploadUrlProvider, timestamp,
};

use crate::mutation::{PartialUpdate, UPDATED_AT};
use crate::outcome::{CreateOutcome, DeleteOutcome, UpdateOutcome};

pub const IMAGE_ID: &str = "imageID";
pub const FILE_NAME: &str = "fileName";
pub const S3_KEY: &str = "s3Key";
pub const CONTENT_TYPE: &str = "contentType";
pub const CREATED_AT: &str = "createdAt";
pub const SIZE_BYTES: &str = "sizeBytes";
pub const IS_DELETED: &str = "isDeleted";
pub const CLOUD_FRONT: &str = "cloudFront";

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const CAMERA: &str = "camera";
pub const LENS: &str = "lens";
pub const APERTURE: &str = "aperture";
pub const SHUTTER: &str = "shutter";
pub const ISO: &str = "iso";
pub const FOCAL_LENGTH: &str = "focalLength";
pub const LOCATION: &str = "location";
pub const DATE_TAKEN: &str = "dateTaken";

/// Attributes returned by [`PhotoCatalog::list`].
pub const LIST_PROJECTION: [&str; 14] = [
    IMAGE_ID,
    FILE_NAME,
    CLOUD_FRONT,
    TITLE,
    DESCRIPTION,
    CAMERA,
    LENS,
    APERTURE,
    SHUTTER,
    ISO,
    FOCAL_LENGTH,
    LOCATION,
    DATE_TAKEN,
    UPDATED_AT,
];

const RANDOM_ID_LEN: usize = 8;
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Optional descriptive metadata, usually extracted from EXIF on upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhotoMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub camera: Option<String>,
    pub lens: Option<String>,
    pub aperture: Option<String>,
    pub shutter: Option<String>,
    pub iso: Option<String>,
    pub focal_length: Option<String>,
    pub location: Option<String>,
    pub date_taken: Option<String>,
}

impl PhotoMetadata {
    /// Attribute name and value of every metadata field.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 10] {
        [
            (TITLE, self.title.as_deref()),
            (DESCRIPTION, self.description.as_deref()),
            (CAMERA, self.camera.as_deref()),
            (LENS, self.lens.as_deref()),
            (APERTURE, self.aperture.as_deref()),
            (SHUTTER, self.shutter.as_deref()),
            (ISO, self.iso.as_deref()),
            (FOCAL_LENGTH, self.focal_length.as_deref()),
            (LOCATION, self.location.as_deref()),
            (DATE_TAKEN, self.date_taken.as_deref()),
        ]
    }
}

/// A photo to register after its object has been uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhoto {
    #[serde(rename = "imageID")]
    pub image_id: String,
    pub file_name: String,
    /// Object size in bytes, as decimal digits.
    pub size_bytes: String,
    #[serde(flatten)]
    pub metadata: PhotoMetadata,
}

/// Fields to change on an existing photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhotoPatch {
    pub file_name: Option<String>,
    #[serde(flatten)]
    pub metadata: PhotoMetadata,
}

impl PhotoPatch {
    /// The partial update this patch describes.
    pub fn to_partial_update(&self) -> PartialUpdate {
        self.metadata.fields().into_iter().fold(
            PartialUpdate::new().field(FILE_NAME, self.file_name.as_deref()),
            |builder, (name, value)| builder.field(name, value),
        )
    }
}

/// Where to upload a new photo and the identifier it will be stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadTicket {
    pub url: String,
    #[serde(rename = "imageID")]
    pub image_id: String,
}

/// Size of the photo table as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhotoStats {
    /// Stored photos, soft-deleted ones included.
    pub count: u64,
}

/// Photo catalog over a record store and an upload URL provider.
pub struct PhotoCatalog<S, U> {
    store: S,
    uploads: U,
    config: Arc<CatalogConfig>,
    table: TableSchema,
}

impl<S: RecordStore, U: UploadUrlProvider> PhotoCatalog<S, U> {
    pub fn new(store: S, uploads: U, config: Arc<CatalogConfig>) -> Self {
        let table = TableSchema::new(config.tables.photos.clone(), &[IMAGE_ID]);
        Self {
            store,
            uploads,
            config,
            table,
        }
    }

    /// List one page of non-deleted photos.
    ///
    /// `cursor` is the identifier returned by the previous page; absent or
    /// empty starts from the beginning. The page size is clamped to the
    /// configured maximum. Deleted rows are filtered after the scan limit is
    /// applied, so a page may be short while `has_more` is still true.
    #[instrument(skip(self))]
    pub async fn list(&self, cursor: Option<&str>, page_size: Option<i64>) -> Result<Page> {
        let limit = self.config.page_size(page_size);
        debug!(limit, "Listing photos");

        let exclusive_start_key = cursor.filter(|c| !c.is_empty()).map(|c| {
            let mut key = Item::new();
            key.insert(IMAGE_ID.to_string(), AttrValue::from(c));
            key
        });

        let request = ScanRequest {
            filter: Some(Condition::equals(IS_DELETED, false)),
            projection: LIST_PROJECTION.iter().map(|a| a.to_string()).collect(),
            limit,
            exclusive_start_key,
        };

        let output = self.store.scan(&self.table, request).await?;

        let cursor = output
            .last_evaluated_key
            .as_ref()
            .and_then(|key| key.get(IMAGE_ID))
            .and_then(AttrValue::as_str)
            .map(str::to_string);
        let has_more = cursor.is_some();

        info!(count = output.items.len(), has_more, "Retrieved photos");

        Ok(Page {
            records: output.items,
            cursor,
            has_more,
        })
    }

    /// Report how many photo records the table holds.
    ///
    /// The figure comes from table metadata, not a scan, so it counts
    /// soft-deleted records and may lag recent writes on DynamoDB.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<PhotoStats> {
        let count = self.store.item_count(&self.table).await?;
        info!(count, "Retrieved photo stats");
        Ok(PhotoStats { count })
    }

    /// Issue an upload URL for a new photo of the given content type.
    ///
    /// The object key is eight random alphanumerics, today's date and the
    /// extension mapped to the content type.
    #[instrument(skip(self))]
    pub async fn create_upload_url(&self, content_type: &str) -> Result<UploadTicket> {
        if content_type.trim().is_empty() {
            return Err(InvalidInputError::field(CONTENT_TYPE, "Content type is required").into());
        }

        let extension = self.config.image_types.get(content_type).ok_or_else(|| {
            InvalidInputError::ContentType {
                value: content_type.to_string(),
                allowed: allowed_list(self.config.image_types.keys()),
            }
        })?;

        let image_id = format!("{}{}{}", random_id(), timestamp::today_compact(), extension);

        let url = self
            .uploads
            .generate_upload_url(
                &self.config.photos_bucket,
                &image_id,
                content_type,
                self.config.photo_upload_ttl(),
            )
            .await?;

        info!(%image_id, "Generated upload URL");
        Ok(UploadTicket { url, image_id })
    }

    /// Register a photo; succeeds at most once per identifier.
    ///
    /// The insert is guarded by `attribute_not_exists(imageID)`, evaluated
    /// by the store, so a duplicate yields [`CreateOutcome::Conflict`]
    /// without any partial write.
    #[instrument(skip(self, photo), fields(image_id = %photo.image_id))]
    pub async fn create(&self, photo: NewPhoto) -> Result<CreateOutcome> {
        let item = self.new_item(&photo)?;

        let condition = Condition::not_exists(IMAGE_ID);
        let outcome = CreateOutcome::from(
            self.store
                .put_item(&self.table, item, Some(&condition))
                .await?,
        );

        match outcome {
            CreateOutcome::Created => info!("Saved photo metadata"),
            CreateOutcome::Conflict => warn!("Photo already exists"),
        }
        Ok(outcome)
    }

    /// Apply a patch to an existing, non-deleted photo.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error, before touching the store, when the
    /// patch has no non-blank field.
    #[instrument(skip(self, patch), fields(image_id = %id))]
    pub async fn update(&self, id: &RecordId, patch: &PhotoPatch) -> Result<UpdateOutcome> {
        let update = patch.to_partial_update().build()?;

        let condition = Condition::exists(IMAGE_ID).and(Condition::equals(IS_DELETED, false));
        let outcome = UpdateOutcome::from(
            self.store
                .update_item(&self.table, &self.key(id), &update, Some(&condition))
                .await?,
        );

        match outcome {
            UpdateOutcome::Updated => info!("Updated photo metadata"),
            UpdateOutcome::NotFound => warn!("Photo not found for update"),
        }
        Ok(outcome)
    }

    /// Mark a photo deleted.
    ///
    /// Only existence is checked, so deleting an already-deleted photo
    /// succeeds again.
    #[instrument(skip(self), fields(image_id = %id))]
    pub async fn soft_delete(&self, id: &RecordId) -> Result<DeleteOutcome> {
        let update = Update::new().set(IS_DELETED, true);
        let condition = Condition::exists(IMAGE_ID);

        let outcome = DeleteOutcome::from(
            self.store
                .update_item(&self.table, &self.key(id), &update, Some(&condition))
                .await?,
        );

        match outcome {
            DeleteOutcome::Deleted => info!("Deleted photo"),
            DeleteOutcome::NotFound => warn!("Photo not found for delete"),
        }
        Ok(outcome)
    }

    fn key(&self, id: &RecordId) -> Item {
        let mut key = Item::new();
        key.insert(IMAGE_ID.to_string(), AttrValue::from(id.as_str()));
        key
    }

    fn new_item(&self, photo: &NewPhoto) -> Result<Item> {
        let id = RecordId::new(photo.image_id.clone())?;

        if photo.file_name.trim().is_empty() {
            return Err(InvalidInputError::field(FILE_NAME, "File name is required").into());
        }
        if photo.size_bytes.is_empty() || !photo.size_bytes.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidInputError::field(SIZE_BYTES, "Size must be a valid number").into());
        }

        let content_type = mime_guess::from_path(&photo.file_name)
            .first_raw()
            .unwrap_or(FALLBACK_CONTENT_TYPE);

        let mut item = Item::new();
        item.insert(IMAGE_ID.to_string(), id.as_str().into());
        item.insert(FILE_NAME.to_string(), photo.file_name.as_str().into());
        item.insert(S3_KEY.to_string(), id.as_str().into());
        item.insert(CONTENT_TYPE.to_string(), content_type.into());
        item.insert(CREATED_AT.to_string(), timestamp::now().into());
        item.insert(SIZE_BYTES.to_string(), photo.size_bytes.as_str().into());
        item.insert(IS_DELETED.to_string(), false.into());
        item.insert(
            CLOUD_FRONT.to_string(),
            format!("{}{}", self.config.photos_cdn, id).into(),
        );

        for (name, value) in photo.metadata.fields() {
            if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
                item.insert(name.to_string(), value.into());
            }
        }

        Ok(item)
    }
}

fn random_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_ID_LEN)
        .map(char::from)
        .collect()
}

pub(crate) fn allowed_list<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    let values: Vec<&str> = values.into_iter().map(String::as_str).collect();
    format!("[{}]", values.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_includes_file_name_and_metadata() {
        let patch = PhotoPatch {
            file_name: Some(" sunset.jpg ".to_string()),
            metadata: PhotoMetadata {
                location: Some("Lisbon".to_string()),
                iso: Some("  ".to_string()),
                ..Default::default()
            },
        };

        let builder = patch.to_partial_update();
        assert_eq!(
            builder.fields(),
            [
                (FILE_NAME.to_string(), "sunset.jpg".to_string()),
                (LOCATION.to_string(), "Lisbon".to_string()),
            ]
        );
    }

    #[test]
    fn random_id_is_alphanumeric() {
        let id = random_id();
        assert_eq!(id.len(), RANDOM_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn new_photo_reads_camel_case_json() {
        let photo: NewPhoto = serde_json::from_str(
            r#"{"imageID":"a1","fileName":"a1.jpg","sizeBytes":"10","focalLength":"35mm"}"#,
        )
        .unwrap();

        assert_eq!(photo.image_id, "a1");
        assert_eq!(photo.metadata.focal_length.as_deref(), Some("35mm"));
    }
}
