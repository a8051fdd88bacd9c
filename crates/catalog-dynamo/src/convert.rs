//! Conversions between catalog attributes and DynamoDB attribute values.

use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::Number;

use catalog_core::repo::{AttrValue, Item};

pub(crate) fn to_aws(value: &AttrValue) -> AttributeValue {
    match value {
        AttrValue::Bool(b) => AttributeValue::Bool(*b),
        AttrValue::Number(n) => AttributeValue::N(n.to_string()),
        AttrValue::String(s) => AttributeValue::S(s.clone()),
    }
}

/// Unsupported representations (lists, maps, sets, binary, null) come back
/// as `None`. Numbers keep integer form when they fit `i64` or `u64`.
pub(crate) fn from_aws(value: &AttributeValue) -> Option<AttrValue> {
    match value {
        AttributeValue::S(s) => Some(AttrValue::String(s.clone())),
        AttributeValue::N(n) => n.parse::<Number>().ok().map(AttrValue::Number),
        AttributeValue::Bool(b) => Some(AttrValue::Bool(*b)),
        _ => None,
    }
}

pub(crate) fn item_to_aws(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(name, value)| (name.clone(), to_aws(value)))
        .collect()
}

pub(crate) fn item_from_aws(map: &HashMap<String, AttributeValue>) -> Item {
    map.iter()
        .filter_map(|(name, value)| from_aws(value).map(|v| (name.clone(), v)))
        .collect()
}

/// DynamoDB rejects empty placeholder maps, so absent ones are sent as `None`.
pub(crate) fn names_param(names: BTreeMap<String, String>) -> Option<HashMap<String, String>> {
    if names.is_empty() {
        None
    } else {
        Some(names.into_iter().collect())
    }
}

pub(crate) fn values_param(
    values: BTreeMap<String, AttrValue>,
) -> Option<HashMap<String, AttributeValue>> {
    if values.is_empty() {
        None
    } else {
        Some(
            values
                .into_iter()
                .map(|(placeholder, value)| (placeholder, to_aws(&value)))
                .collect(),
        )
    }
}
