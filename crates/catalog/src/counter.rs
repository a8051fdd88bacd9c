//! Visit counter keyed by calendar month.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use catalog_core::error::StoreError;
use catalog_core::types::{MONTH_ATTR, YEAR_ATTR};
use catalog_core::{
    AttrValue, CatalogConfig, Condition, Conditional, Error, Item, PeriodKey, RecordStore, Result,
    TableSchema, Update,
};

pub const COUNT: &str = "count";

/// A counter value read for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisitCount {
    pub count: i64,
    /// True when this call created the entry.
    #[serde(skip)]
    pub initialized: bool,
}

/// Atomic per-period counter.
pub struct VisitCounter<S> {
    store: S,
    table: TableSchema,
}

impl<S: RecordStore> VisitCounter<S> {
    pub fn new(store: S, config: Arc<CatalogConfig>) -> Self {
        let table = TableSchema::new(config.tables.visitors.clone(), &[YEAR_ATTR, MONTH_ATTR]);
        Self { store, table }
    }

    /// Read the count for a period, creating the entry with a count of 1 if
    /// it does not exist.
    ///
    /// Creation is guarded by both key attributes being absent. Losing that
    /// race to a concurrent creator is not an error: the winner's entry is
    /// read back instead.
    #[instrument(skip(self), fields(period = %period))]
    pub async fn get_or_init(&self, period: PeriodKey) -> Result<VisitCount> {
        let key = period.to_key();

        if let Some(item) = self.store.get_item(&self.table, &key, &[]).await? {
            debug!("Counter entry found");
            return Ok(VisitCount {
                count: count_of(&item)?,
                initialized: false,
            });
        }

        let mut item = key.clone();
        item.insert(COUNT.to_string(), AttrValue::from(1));

        let condition = Condition::not_exists(YEAR_ATTR).and(Condition::not_exists(MONTH_ATTR));
        match self.store.put_item(&self.table, item, Some(&condition)).await? {
            Conditional::Applied(()) => {
                info!("Counter entry created");
                Ok(VisitCount {
                    count: 1,
                    initialized: true,
                })
            }
            Conditional::ConditionFailed => {
                warn!("Counter entry created concurrently");
                let count = match self.store.get_item(&self.table, &key, &[]).await? {
                    Some(item) => count_of(&item)?,
                    None => 1,
                };
                Ok(VisitCount {
                    count,
                    initialized: false,
                })
            }
        }
    }

    /// Add one to a period's count and return the new value.
    ///
    /// A missing entry or count starts from zero. The increment is a single
    /// store update, so concurrent calls never lose a count.
    #[instrument(skip(self), fields(period = %period))]
    pub async fn increment(&self, period: PeriodKey) -> Result<i64> {
        let update = Update::new().increment(COUNT, 0, 1);

        match self
            .store
            .update_item(&self.table, &period.to_key(), &update, None)
            .await?
        {
            Conditional::Applied(item) => {
                let count = count_of(&item)?;
                info!(count, "Counter incremented");
                Ok(count)
            }
            Conditional::ConditionFailed => {
                Err(Error::internal("unconditional counter update was rejected"))
            }
        }
    }
}

fn count_of(item: &Item) -> Result<i64> {
    item.get(COUNT).and_then(AttrValue::as_i64).ok_or_else(|| {
        StoreError::UnexpectedResponse {
            message: "counter entry has no numeric count".to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_requires_a_number() {
        let mut item = Item::new();
        item.insert(COUNT.to_string(), AttrValue::from("7"));
        assert!(count_of(&item).is_err());

        item.insert(COUNT.to_string(), AttrValue::from(7));
        assert_eq!(count_of(&item).unwrap(), 7);
    }
}
