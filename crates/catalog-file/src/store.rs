//! Filesystem storage for the record catalog.
//!
//! Each table is one JSON document mapping encoded primary keys to stored
//! items. Every operation holds an exclusive lock on the table's lock file
//! for its whole read-evaluate-write cycle, which makes each conditional
//! write atomic with respect to every other writer, in or out of process.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::ops::Bound;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use catalog_core::error::{InvalidInputError, StoreError};
use catalog_core::repo::{Item, TableSchema, item_from_json, item_to_json};
use catalog_core::traits::{Conditional, RecordStore, ScanOutput, ScanRequest};
use catalog_core::{Condition, Result, Update};

/// Stored form of a table: encoded key to raw JSON object.
type TableData = BTreeMap<String, Map<String, Value>>;

/// Exclusive lock on one table, released on drop.
struct TableLock {
    file: File,
}

impl Drop for TableLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Filesystem-backed record store.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new file store at the given root directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the tables directory.
    fn tables_dir(&self) -> PathBuf {
        self.root.join("tables")
    }

    /// Get the data file for a table.
    fn table_path(&self, table: &TableSchema) -> PathBuf {
        self.tables_dir().join(format!("{}.json", table.name))
    }

    /// Get the lock file for a table.
    fn lock_path(&self, table: &TableSchema) -> PathBuf {
        self.tables_dir().join(format!("{}.lock", table.name))
    }

    fn validate_table(table: &TableSchema) -> Result<()> {
        let valid = !table.name.is_empty()
            && table
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !table.name.starts_with('.');

        if !valid {
            return Err(InvalidInputError::Other {
                message: format!("invalid table name '{}'", table.name),
            }
            .into());
        }

        if table.key.is_empty() {
            return Err(InvalidInputError::Other {
                message: format!("table '{}' has no key attributes", table.name),
            }
            .into());
        }

        Ok(())
    }

    fn lock_table(&self, table: &TableSchema) -> Result<TableLock> {
        Self::validate_table(table)?;
        fs::create_dir_all(self.tables_dir())?;

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path(table))?;

        FileExt::lock_exclusive(&file)?;

        Ok(TableLock { file })
    }

    fn read_table(&self, table: &TableSchema) -> Result<TableData> {
        let path = self.table_path(table);

        if !path.exists() {
            return Ok(TableData::new());
        }

        let content = fs::read_to_string(&path)?;
        let data = serde_json::from_str(&content).map_err(StoreError::from)?;
        Ok(data)
    }

    fn write_table(&self, table: &TableSchema, data: &TableData) -> Result<()> {
        let path = self.table_path(table);
        let content = serde_json::to_string_pretty(data).map_err(StoreError::from)?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    fn project(item: Item, projection: &[String]) -> Item {
        if projection.is_empty() {
            return item;
        }
        item.into_iter()
            .filter(|(name, _)| projection.contains(name))
            .collect()
    }

    fn check_key_untouched(table: &TableSchema, update: &Update) -> Result<()> {
        if let Some(field) = update.fields().find(|f| table.key.iter().any(|k| k == f)) {
            return Err(InvalidInputError::Expression {
                reason: format!("cannot update key attribute {}", field),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    #[instrument(skip(self, table, request), fields(table = %table.name, limit = request.limit))]
    async fn scan(&self, table: &TableSchema, request: ScanRequest) -> Result<ScanOutput> {
        if request.limit == 0 {
            return Err(InvalidInputError::Other {
                message: "scan limit must be at least 1".to_string(),
            }
            .into());
        }

        let _lock = self.lock_table(table)?;
        let data = self.read_table(table)?;

        let start = match &request.exclusive_start_key {
            Some(key) => Bound::Excluded(table.encode_key(key)?),
            None => Bound::Unbounded,
        };

        let limit = request.limit as usize;
        let window: Vec<&Map<String, Value>> = data
            .range((start, Bound::Unbounded))
            .map(|(_, stored)| stored)
            .take(limit + 1)
            .collect();

        let more = window.len() > limit;
        let examined = &window[..window.len().min(limit)];

        let mut items = Vec::new();
        let mut last_examined = None;

        for stored in examined {
            let item = item_from_json(stored);
            last_examined = Some(table.key_of(&item)?);

            let keep = request
                .filter
                .as_ref()
                .is_none_or(|filter| filter.evaluate(Some(&item)));

            if keep {
                items.push(Self::project(item, &request.projection));
            }
        }

        let last_evaluated_key = if more { last_examined } else { None };

        debug!(
            examined = examined.len(),
            returned = items.len(),
            more,
            "Scanned table"
        );

        Ok(ScanOutput {
            items,
            last_evaluated_key,
        })
    }

    #[instrument(skip(self, table), fields(table = %table.name))]
    async fn item_count(&self, table: &TableSchema) -> Result<u64> {
        let _lock = self.lock_table(table)?;
        let data = self.read_table(table)?;
        Ok(data.len() as u64)
    }

    #[instrument(skip(self, table, key, projection), fields(table = %table.name))]
    async fn get_item(
        &self,
        table: &TableSchema,
        key: &Item,
        projection: &[String],
    ) -> Result<Option<Item>> {
        let encoded = table.encode_key(key)?;

        let _lock = self.lock_table(table)?;
        let data = self.read_table(table)?;

        Ok(data
            .get(&encoded)
            .map(item_from_json)
            .map(|item| Self::project(item, projection)))
    }

    #[instrument(skip(self, table, item, condition), fields(table = %table.name))]
    async fn put_item(
        &self,
        table: &TableSchema,
        item: Item,
        condition: Option<&Condition>,
    ) -> Result<Conditional<()>> {
        let encoded = table.encode_key(&item)?;

        let _lock = self.lock_table(table)?;
        let mut data = self.read_table(table)?;

        let current = data.get(&encoded).map(item_from_json);
        if let Some(condition) = condition
            && !condition.evaluate(current.as_ref())
        {
            debug!(key = %encoded, "Put condition failed");
            return Ok(Conditional::ConditionFailed);
        }

        data.insert(encoded.clone(), item_to_json(&item));
        self.write_table(table, &data)?;

        debug!(key = %encoded, "Put item");

        Ok(Conditional::Applied(()))
    }

    #[instrument(skip(self, table, key, update, condition), fields(table = %table.name))]
    async fn update_item(
        &self,
        table: &TableSchema,
        key: &Item,
        update: &Update,
        condition: Option<&Condition>,
    ) -> Result<Conditional<Item>> {
        if update.is_empty() {
            return Err(InvalidInputError::Expression {
                reason: "update has no clauses".to_string(),
            }
            .into());
        }
        Self::check_key_untouched(table, update)?;

        let key = table.key_of(key)?;
        let encoded = table.encode_key(&key)?;

        let _lock = self.lock_table(table)?;
        let mut data = self.read_table(table)?;

        let stored = data.get(&encoded).cloned();
        let current = stored.as_ref().map(item_from_json);

        if let Some(condition) = condition
            && !condition.evaluate(current.as_ref())
        {
            debug!(key = %encoded, "Update condition failed");
            return Ok(Conditional::ConditionFailed);
        }

        let mut item = current.unwrap_or_else(|| key.clone());
        update.apply(&mut item)?;

        // Write back only the touched fields so attributes this store cannot
        // model survive the update.
        let mut object = stored.unwrap_or_else(|| item_to_json(&key));
        for field in update.fields() {
            if let Some(value) = item.get(field) {
                object.insert(field.to_string(), value.to_json());
            }
        }

        data.insert(encoded.clone(), object);
        self.write_table(table, &data)?;

        debug!(key = %encoded, "Updated item");

        Ok(Conditional::Applied(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::AttrValue;
    use tempfile::TempDir;

    fn photos() -> TableSchema {
        TableSchema::new("tbl_photo", &["imageID"])
    }

    fn photo(id: &str, deleted: bool) -> Item {
        let mut item = Item::new();
        item.insert("imageID".to_string(), id.into());
        item.insert("fileName".to_string(), format!("{}.jpg", id).into());
        item.insert("isDeleted".to_string(), deleted.into());
        item
    }

    fn key(id: &str) -> Item {
        let mut key = Item::new();
        key.insert("imageID".to_string(), id.into());
        key
    }

    #[tokio::test]
    async fn put_then_get() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let result = store.put_item(&photos(), photo("a", false), None).await.unwrap();
        assert!(result.is_applied());

        let item = store.get_item(&photos(), &key("a"), &[]).await.unwrap().unwrap();
        assert_eq!(item["fileName"], AttrValue::from("a.jpg"));

        let missing = store.get_item(&photos(), &key("b"), &[]).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn conditional_put_rejects_existing() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let guard = Condition::not_exists("imageID");

        let first = store
            .put_item(&photos(), photo("a", false), Some(&guard))
            .await
            .unwrap();
        let second = store
            .put_item(&photos(), photo("a", true), Some(&guard))
            .await
            .unwrap();

        assert_eq!(first, Conditional::Applied(()));
        assert_eq!(second, Conditional::ConditionFailed);

        let item = store.get_item(&photos(), &key("a"), &[]).await.unwrap().unwrap();
        assert_eq!(item["isDeleted"], AttrValue::Bool(false));
    }

    #[tokio::test]
    async fn scan_pages_by_examined_items() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        for (id, deleted) in [("a", false), ("b", true), ("c", false), ("d", false)] {
            store.put_item(&photos(), photo(id, deleted), None).await.unwrap();
        }

        let request = ScanRequest {
            filter: Some(Condition::equals("isDeleted", false)),
            projection: vec!["imageID".to_string()],
            limit: 2,
            exclusive_start_key: None,
        };

        let first = store.scan(&photos(), request.clone()).await.unwrap();
        // "b" is filtered out but still counted against the limit.
        assert_eq!(first.items, vec![key("a")]);
        assert_eq!(first.last_evaluated_key, Some(key("b")));

        let second = store
            .scan(
                &photos(),
                ScanRequest {
                    exclusive_start_key: first.last_evaluated_key,
                    ..request
                },
            )
            .await
            .unwrap();
        assert_eq!(second.items, vec![key("c"), key("d")]);
        assert_eq!(second.last_evaluated_key, None);
    }

    #[tokio::test]
    async fn update_respects_condition() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let guard = Condition::exists("imageID");
        let update = Update::new().set("title", "Dusk");

        let missing = store
            .update_item(&photos(), &key("a"), &update, Some(&guard))
            .await
            .unwrap();
        assert_eq!(missing, Conditional::ConditionFailed);
        assert!(store.get_item(&photos(), &key("a"), &[]).await.unwrap().is_none());

        store.put_item(&photos(), photo("a", false), None).await.unwrap();
        let applied = store
            .update_item(&photos(), &key("a"), &update, Some(&guard))
            .await
            .unwrap();

        match applied {
            Conditional::Applied(item) => {
                assert_eq!(item["title"], AttrValue::from("Dusk"));
                assert_eq!(item["fileName"], AttrValue::from("a.jpg"));
            }
            Conditional::ConditionFailed => panic!("expected update to apply"),
        }
    }

    #[tokio::test]
    async fn unconditional_update_creates_item() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let visitors = TableSchema::new("tbl_visitor", &["year", "month"]);

        let mut key = Item::new();
        key.insert("year".to_string(), 2024.into());
        key.insert("month".to_string(), 5.into());

        let result = store
            .update_item(&visitors, &key, &Update::new().increment("count", 0, 1), None)
            .await
            .unwrap();

        match result {
            Conditional::Applied(item) => {
                assert_eq!(item["count"], AttrValue::from(1));
                assert_eq!(item["year"], AttrValue::from(2024));
            }
            Conditional::ConditionFailed => panic!("expected upsert"),
        }
    }

    #[tokio::test]
    async fn update_cannot_touch_key() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let result = store
            .update_item(&photos(), &key("a"), &Update::new().set("imageID", "b"), None)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn update_preserves_unmodelled_attributes() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.put_item(&photos(), photo("a", false), None).await.unwrap();

        // Simulate an attribute written by another tool.
        let path = dir.path().join("tables").join("tbl_photo.json");
        let encoded = photos().encode_key(&key("a")).unwrap();
        let mut data: TableData =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        data.get_mut(&encoded)
            .unwrap()
            .insert("tags".to_string(), serde_json::json!(["sunset"]));
        fs::write(&path, serde_json::to_string(&data).unwrap()).unwrap();

        store
            .update_item(&photos(), &key("a"), &Update::new().set("title", "t"), None)
            .await
            .unwrap();

        let data: TableData = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(data[&encoded]["tags"], serde_json::json!(["sunset"]));
        assert_eq!(data[&encoded]["title"], serde_json::json!("t"));
    }

    #[tokio::test]
    async fn decimal_and_wide_numbers_survive_scan() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        let mut item = photo("a", false);
        item.insert(
            "aperture".to_string(),
            serde_json::Number::from_f64(2.8).unwrap().into(),
        );
        item.insert(
            "iso".to_string(),
            serde_json::Number::from(u64::MAX).into(),
        );
        store.put_item(&photos(), item.clone(), None).await.unwrap();

        let request = ScanRequest {
            limit: 10,
            ..ScanRequest::default()
        };
        let output = store.scan(&photos(), request).await.unwrap();

        assert_eq!(output.items, vec![item]);
        let path = dir.path().join("tables").join("tbl_photo.json");
        let raw = fs::read_to_string(path).unwrap();
        assert!(raw.contains("2.8"));
        assert!(raw.contains("18446744073709551615"));
    }

    #[tokio::test]
    async fn item_count_tracks_stored_items() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        assert_eq!(store.item_count(&photos()).await.unwrap(), 0);

        for id in ["a", "b", "c"] {
            store.put_item(&photos(), photo(id, id == "b"), None).await.unwrap();
        }
        // Soft-deleted rows are still stored items.
        assert_eq!(store.item_count(&photos()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn rejects_path_like_table_names() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let table = TableSchema::new("../escape", &["id"]);

        let mut key = Item::new();
        key.insert("id".to_string(), "x".into());
        assert!(store.get_item(&table, &key, &[]).await.is_err());
    }
}
