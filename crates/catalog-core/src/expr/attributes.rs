//! Placeholder binding for expression attribute names and values.

use std::collections::{BTreeMap, HashMap};

use crate::repo::AttrValue;

/// Name and value placeholder maps for one request.
///
/// Field names bind to `#nK`, values to `:vK`. Binding the same field name
/// twice returns the same placeholder; values are always bound fresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpressionAttributes {
    names: BTreeMap<String, String>,
    by_field: HashMap<String, String>,
    values: BTreeMap<String, AttrValue>,
}

impl ExpressionAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a field name, returning its placeholder.
    pub fn name(&mut self, field: &str) -> String {
        if let Some(placeholder) = self.by_field.get(field) {
            return placeholder.clone();
        }

        let placeholder = format!("#n{}", self.names.len());
        self.names.insert(placeholder.clone(), field.to_string());
        self.by_field.insert(field.to_string(), placeholder.clone());
        placeholder
    }

    /// Bind a value, returning its placeholder.
    pub fn value(&mut self, value: &AttrValue) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), value.clone());
        placeholder
    }

    /// Render a projection list.
    pub fn projection(&mut self, fields: &[String]) -> String {
        fields
            .iter()
            .map(|field| self.name(field))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Placeholder to field name bindings.
    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    /// Placeholder to value bindings.
    pub fn values(&self) -> &BTreeMap<String, AttrValue> {
        &self.values
    }

    /// Consume into (names, values).
    pub fn into_parts(self) -> (BTreeMap<String, String>, BTreeMap<String, AttrValue>) {
        (self.names, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_name_placeholders() {
        let mut attrs = ExpressionAttributes::new();
        let a = attrs.name("description");
        let b = attrs.name("date");
        let c = attrs.name("description");

        assert_eq!(a, "#n0");
        assert_eq!(b, "#n1");
        assert_eq!(a, c);
        assert_eq!(attrs.names().len(), 2);
    }

    #[test]
    fn values_are_always_fresh() {
        let mut attrs = ExpressionAttributes::new();
        let a = attrs.value(&AttrValue::Bool(false));
        let b = attrs.value(&AttrValue::Bool(false));

        assert_eq!(a, ":v0");
        assert_eq!(b, ":v1");
    }

    #[test]
    fn renders_projection() {
        let mut attrs = ExpressionAttributes::new();
        let fields = vec!["imageID".to_string(), "title".to_string()];
        assert_eq!(attrs.projection(&fields), "#n0, #n1");
        assert_eq!(attrs.names()["#n1"], "title");
    }
}
