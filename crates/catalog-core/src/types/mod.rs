//! Core catalog types.
//!
//! These types enforce their invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod period_key;
mod record_id;
mod store_url;

pub use period_key::{MONTH_ATTR, PeriodKey, YEAR_ATTR};
pub use record_id::RecordId;
pub use store_url::StoreUrl;
