//! Record store trait.

use async_trait::async_trait;

use crate::Result;
use crate::expr::{Condition, Update};
use crate::repo::{Item, TableSchema};

/// Parameters of a filtered scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanRequest {
    /// Only items matching this condition are returned.
    pub filter: Option<Condition>,

    /// Attributes to return; empty means all.
    pub projection: Vec<String>,

    /// Maximum number of items to examine, before filtering.
    pub limit: u32,

    /// Resume strictly after this key.
    pub exclusive_start_key: Option<Item>,
}

/// Result of one scan call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutput {
    /// Items that passed the filter, projected.
    pub items: Vec<Item>,

    /// Key of the last examined item when unexamined items remain.
    pub last_evaluated_key: Option<Item>,
}

/// Outcome of a conditional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conditional<T> {
    /// The condition held and the write was applied.
    Applied(T),
    /// The condition did not hold; nothing changed.
    ConditionFailed,
}

impl<T> Conditional<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Conditional::Applied(_))
    }
}

/// A key-value/document store with per-item conditional writes.
///
/// Conditions are evaluated atomically with the write they guard; a
/// failed condition is reported as [`Conditional::ConditionFailed`], never
/// as an error.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Scan a table with a filter and projection.
    async fn scan(&self, table: &TableSchema, request: ScanRequest) -> Result<ScanOutput>;

    /// Approximate number of items stored in a table, deleted or not.
    ///
    /// Backends may report a periodically refreshed figure rather than an
    /// exact count.
    async fn item_count(&self, table: &TableSchema) -> Result<u64>;

    /// Fetch one item by key.
    async fn get_item(
        &self,
        table: &TableSchema,
        key: &Item,
        projection: &[String],
    ) -> Result<Option<Item>>;

    /// Store a full item, replacing any existing one, if the condition holds.
    async fn put_item(
        &self,
        table: &TableSchema,
        item: Item,
        condition: Option<&Condition>,
    ) -> Result<Conditional<()>>;

    /// Apply an update to one item if the condition holds.
    ///
    /// A missing item is created from its key when the condition allows.
    /// Returns every attribute of the item after the update.
    async fn update_item(
        &self,
        table: &TableSchema,
        key: &Item,
        update: &Update,
        condition: Option<&Condition>,
    ) -> Result<Conditional<Item>>;
}
