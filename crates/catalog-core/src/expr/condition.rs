//! Precondition expressions.

use crate::repo::{AttrValue, Item};

use super::ExpressionAttributes;

/// A precondition evaluated by the store against the current item state.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The attribute is present.
    AttributeExists(String),
    /// The attribute is absent (also true when the item does not exist).
    AttributeNotExists(String),
    /// The attribute is present and equal to the value.
    Equals(String, AttrValue),
    /// Both conditions hold.
    And(Box<Condition>, Box<Condition>),
}

impl Condition {
    pub fn exists(field: impl Into<String>) -> Self {
        Condition::AttributeExists(field.into())
    }

    pub fn not_exists(field: impl Into<String>) -> Self {
        Condition::AttributeNotExists(field.into())
    }

    pub fn equals(field: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Condition::Equals(field.into(), value.into())
    }

    /// Conjoin with another condition.
    pub fn and(self, other: Condition) -> Self {
        Condition::And(Box::new(self), Box::new(other))
    }

    /// Evaluate against the current item, `None` meaning the item is absent.
    pub fn evaluate(&self, item: Option<&Item>) -> bool {
        match self {
            Condition::AttributeExists(field) => item.is_some_and(|i| i.contains_key(field)),
            Condition::AttributeNotExists(field) => !item.is_some_and(|i| i.contains_key(field)),
            Condition::Equals(field, value) => item.and_then(|i| i.get(field)) == Some(value),
            Condition::And(a, b) => a.evaluate(item) && b.evaluate(item),
        }
    }

    /// Render to expression text, binding names and values.
    pub fn render(&self, attrs: &mut ExpressionAttributes) -> String {
        match self {
            Condition::AttributeExists(field) => {
                format!("attribute_exists({})", attrs.name(field))
            }
            Condition::AttributeNotExists(field) => {
                format!("attribute_not_exists({})", attrs.name(field))
            }
            Condition::Equals(field, value) => {
                let name = attrs.name(field);
                format!("{} = {}", name, attrs.value(value))
            }
            Condition::And(a, b) => {
                let left = a.render(attrs);
                format!("{} AND {}", left, b.render(attrs))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(deleted: bool) -> Item {
        let mut item = Item::new();
        item.insert("imageID".to_string(), "a".into());
        item.insert("isDeleted".to_string(), deleted.into());
        item
    }

    #[test]
    fn exists_on_missing_item_is_false() {
        assert!(!Condition::exists("imageID").evaluate(None));
        assert!(Condition::not_exists("imageID").evaluate(None));
    }

    #[test]
    fn active_guard() {
        let guard = Condition::exists("imageID").and(Condition::equals("isDeleted", false));

        assert!(guard.evaluate(Some(&photo(false))));
        assert!(!guard.evaluate(Some(&photo(true))));
        assert!(!guard.evaluate(None));
    }

    #[test]
    fn equals_requires_same_type() {
        let mut item = Item::new();
        item.insert("isDeleted".to_string(), "false".into());
        assert!(!Condition::equals("isDeleted", false).evaluate(Some(&item)));
    }

    #[test]
    fn renders_with_placeholders() {
        let guard = Condition::exists("imageID").and(Condition::equals("isDeleted", false));
        let mut attrs = ExpressionAttributes::new();

        assert_eq!(guard.render(&mut attrs), "attribute_exists(#n0) AND #n1 = :v0");
        assert_eq!(attrs.names()["#n0"], "imageID");
        assert_eq!(attrs.names()["#n1"], "isDeleted");
        assert_eq!(attrs.values()[":v0"], AttrValue::Bool(false));
    }

    #[test]
    fn composite_absence_renders_both_components() {
        let guard = Condition::not_exists("year").and(Condition::not_exists("month"));
        let mut attrs = ExpressionAttributes::new();

        assert_eq!(
            guard.render(&mut attrs),
            "attribute_not_exists(#n0) AND attribute_not_exists(#n1)"
        );
    }
}
