//! Scalar attribute values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A record: attribute name to scalar value.
pub type Item = BTreeMap<String, AttrValue>;

/// A scalar attribute value.
///
/// Strings, numbers and booleans are modelled. Numbers keep their JSON
/// representation, so integers beyond `i64` and decimals survive a read and
/// write unchanged. Lists, maps and nulls are dropped when the item is read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Number(Number),
    String(String),
}

impl AttrValue {
    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            AttrValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the value as an `i64`, if this is a number that fits.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    /// Returns the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert a JSON value, returning `None` for unsupported shapes.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(AttrValue::Bool(*b)),
            Value::Number(n) => Some(AttrValue::Number(n.clone())),
            Value::String(s) => Some(AttrValue::String(s.clone())),
            _ => None,
        }
    }

    /// Convert to a JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::Number(n) => Value::Number(n.clone()),
            AttrValue::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Number(Number::from(n))
    }
}

impl From<Number> for AttrValue {
    fn from(n: Number) -> Self {
        AttrValue::Number(n)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

/// Build an item from a JSON object, silently dropping unsupported values.
pub fn item_from_json(object: &Map<String, Value>) -> Item {
    object
        .iter()
        .filter_map(|(name, value)| AttrValue::from_json(value).map(|v| (name.clone(), v)))
        .collect()
}

/// Render an item as a JSON object.
pub fn item_to_json(item: &Item) -> Map<String, Value> {
    item.iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_shapes_are_dropped() {
        let object = json!({
            "imageID": "abc",
            "isDeleted": false,
            "count": 3,
            "tags": ["a", "b"],
            "exif": {"iso": 100},
            "lens": null
        });

        let item = item_from_json(object.as_object().unwrap());

        assert_eq!(item.len(), 3);
        assert_eq!(item["imageID"], AttrValue::from("abc"));
        assert_eq!(item["isDeleted"], AttrValue::Bool(false));
        assert_eq!(item["count"], AttrValue::from(3));
    }

    #[test]
    fn decimals_and_wide_integers_are_kept() {
        let object = json!({
            "aperture": 2.8,
            "iso": u64::MAX,
            "offset": -12
        });

        let item = item_from_json(object.as_object().unwrap());

        assert_eq!(item.len(), 3);
        assert_eq!(item["aperture"].as_number().and_then(Number::as_f64), Some(2.8));
        assert_eq!(item["iso"].as_number().and_then(Number::as_u64), Some(u64::MAX));
        assert_eq!(item["iso"].as_i64(), None);
        assert_eq!(item["offset"].as_i64(), Some(-12));
        assert_eq!(Value::Object(item_to_json(&item)), object);
    }

    #[test]
    fn serializes_as_plain_json() {
        let mut item = Item::new();
        item.insert("title".to_string(), "Dusk".into());
        item.insert("count".to_string(), 7.into());

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value, json!({"count": 7, "title": "Dusk"}));
    }

    #[test]
    fn accessors_match_variant() {
        assert_eq!(AttrValue::from("x").as_str(), Some("x"));
        assert_eq!(AttrValue::from("x").as_number(), None);
        assert_eq!(AttrValue::from(4).as_i64(), Some(4));
        assert_eq!(AttrValue::Bool(true).as_bool(), Some(true));
    }
}
