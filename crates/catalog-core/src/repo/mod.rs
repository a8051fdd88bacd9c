//! Record model.
//!
//! Records are flat maps of scalar attributes. This module defines the
//! attribute values, table schemas and the page type returned by listings.

mod attribute;
mod types;

pub use attribute::{AttrValue, Item, item_from_json, item_to_json};
pub use types::{Page, TableSchema};
