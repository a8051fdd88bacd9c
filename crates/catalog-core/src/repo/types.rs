//! Table and listing types.

use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};

use super::{AttrValue, Item};

/// A table name together with its primary key attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// The table name.
    pub name: String,

    /// Key attribute names, partition key first.
    pub key: Vec<String>,
}

impl TableSchema {
    /// Create a schema from a table name and its key attributes.
    pub fn new(name: impl Into<String>, key: &[&str]) -> Self {
        Self {
            name: name.into(),
            key: key.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Extract the primary key attributes from an item.
    ///
    /// # Errors
    ///
    /// Returns an error if any key attribute is missing.
    pub fn key_of(&self, item: &Item) -> Result<Item, Error> {
        self.key
            .iter()
            .map(|name| {
                item.get(name)
                    .map(|value| (name.clone(), value.clone()))
                    .ok_or_else(|| {
                        Error::from(InvalidInputError::field(
                            name.as_str(),
                            format!("key attribute missing for table {}", self.name),
                        ))
                    })
            })
            .collect()
    }

    /// Encode a key into a single sortable string.
    ///
    /// Components are compared in key order. Integers sort numerically,
    /// negatives included, and no two distinct keys share an encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if any key attribute is missing.
    pub fn encode_key(&self, item: &Item) -> Result<String, Error> {
        let key = self.key_of(item)?;
        let mut encoded = String::new();
        for value in self.key.iter().filter_map(|name| key.get(name)) {
            push_component(&mut encoded, value);
        }
        Ok(encoded)
    }
}

/// Offset that maps every `i64` and `u64` onto a non-negative integer.
const INTEGER_BIAS: i128 = 1 << 64;

fn push_component(out: &mut String, value: &AttrValue) {
    let text = match value {
        AttrValue::Number(n) => match n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
        {
            Some(int) => format!("i{:020}", int + INTEGER_BIAS),
            None => format!("f{}", n),
        },
        AttrValue::Bool(b) => format!("b{}", b),
        AttrValue::String(s) => format!("s{}", s),
    };

    // NUL is escaped so the terminator sorts below every continuation.
    for c in text.chars() {
        if c == '\0' {
            out.push_str("\0\u{2}");
        } else {
            out.push(c);
        }
    }
    out.push_str("\0\u{1}");
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// The records in this page, after filtering.
    pub records: Vec<Item>,

    /// Identifier of the last record examined, if the listing can continue.
    pub cursor: Option<String>,

    /// True when the store reported unexamined records beyond this page.
    ///
    /// A page may hold fewer records than requested even when this is true:
    /// filtered-out rows still count against the per-page scan limit.
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(pairs: &[(&str, AttrValue)]) -> Item {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn key_of_keeps_only_key_attributes() {
        let schema = TableSchema::new("tbl_photo", &["imageID"]);
        let record = item(&[("imageID", "a".into()), ("title", "t".into())]);

        let key = schema.key_of(&record).unwrap();
        assert_eq!(key, item(&[("imageID", "a".into())]));
    }

    #[test]
    fn key_of_missing_attribute_fails() {
        let schema = TableSchema::new("tbl_visitor", &["year", "month"]);
        let record = item(&[("year", 2024.into())]);
        assert!(schema.key_of(&record).is_err());
    }

    fn encode(schema: &TableSchema, pairs: &[(&str, AttrValue)]) -> String {
        schema.encode_key(&item(pairs)).unwrap()
    }

    #[test]
    fn negative_keys_sort_before_positive() {
        let schema = TableSchema::new("tbl_offsets", &["offset"]);
        let keys: Vec<String> = [-5, -1, 0, 3, i64::MAX]
            .into_iter()
            .map(|n| encode(&schema, &[("offset", n.into())]))
            .collect();

        assert!(keys.windows(2).all(|w| w[0] < w[1]), "{keys:?}");
        let wide = encode(&schema, &[("offset", serde_json::Number::from(u64::MAX).into())]);
        assert!(keys[4] < wide);
    }

    #[test]
    fn separators_inside_values_do_not_collide() {
        let schema = TableSchema::new("tbl_pairs", &["a", "b"]);
        let left = encode(&schema, &[("a", "x\0\u{1}sy".into()), ("b", "z".into())]);
        let right = encode(&schema, &[("a", "x".into()), ("b", "y\0\u{1}sz".into())]);
        assert_ne!(left, right);

        let unit = encode(&schema, &[("a", "x\u{1f}y".into()), ("b", "z".into())]);
        let split = encode(&schema, &[("a", "x".into()), ("b", "y\u{1f}z".into())]);
        assert_ne!(unit, split);
    }

    #[test]
    fn string_prefix_sorts_first() {
        let schema = TableSchema::new("tbl_photo", &["imageID"]);
        let short = encode(&schema, &[("imageID", "ab".into())]);
        let long = encode(&schema, &[("imageID", "ab\0".into())]);
        let longer = encode(&schema, &[("imageID", "abc".into())]);
        assert!(short < long && long < longer);
    }

    #[test]
    fn numeric_keys_sort_numerically() {
        let schema = TableSchema::new("tbl_visitor", &["year", "month"]);
        let feb = schema
            .encode_key(&item(&[("year", 2024.into()), ("month", 2.into())]))
            .unwrap();
        let nov = schema
            .encode_key(&item(&[("year", 2024.into()), ("month", 11.into())]))
            .unwrap();
        assert!(feb < nov);
    }
}
