//! Update expressions.

use crate::error::{Error, InvalidInputError};
use crate::repo::{AttrValue, Item};

use super::ExpressionAttributes;

/// A single SET clause.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// `field = value`
    Set(String, AttrValue),
    /// `field = if_not_exists(field, start) + by`
    Increment { field: String, start: i64, by: i64 },
}

/// An ordered list of SET clauses applied atomically to one item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    actions: Vec<UpdateAction>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `field = value` clause.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.actions.push(UpdateAction::Set(field.into(), value.into()));
        self
    }

    /// Add a `field = if_not_exists(field, start) + by` clause.
    pub fn increment(mut self, field: impl Into<String>, start: i64, by: i64) -> Self {
        self.actions.push(UpdateAction::Increment {
            field: field.into(),
            start,
            by,
        });
        self
    }

    pub fn actions(&self) -> &[UpdateAction] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Names of every field this update writes.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|action| match action {
            UpdateAction::Set(field, _) => field.as_str(),
            UpdateAction::Increment { field, .. } => field.as_str(),
        })
    }

    /// Apply every clause to an item in place.
    ///
    /// # Errors
    ///
    /// Returns an error if an increment targets a non-numeric attribute or
    /// overflows.
    pub fn apply(&self, item: &mut Item) -> Result<(), Error> {
        for action in &self.actions {
            match action {
                UpdateAction::Set(field, value) => {
                    item.insert(field.clone(), value.clone());
                }
                UpdateAction::Increment { field, start, by } => {
                    let current = match item.get(field) {
                        None => *start,
                        // Decimals and integers beyond i64 are not counters.
                        Some(value) => value.as_i64().ok_or_else(|| {
                            Error::from(InvalidInputError::Expression {
                                reason: format!("operand type mismatch for {}", field),
                            })
                        })?,
                    };
                    let next = current.checked_add(*by).ok_or_else(|| {
                        Error::from(InvalidInputError::Expression {
                            reason: format!("numeric overflow for {}", field),
                        })
                    })?;
                    item.insert(field.clone(), AttrValue::from(next));
                }
            }
        }
        Ok(())
    }

    /// Render to `SET ...` expression text, binding names and values.
    pub fn render(&self, attrs: &mut ExpressionAttributes) -> String {
        let clauses: Vec<String> = self
            .actions
            .iter()
            .map(|action| match action {
                UpdateAction::Set(field, value) => {
                    let name = attrs.name(field);
                    format!("{} = {}", name, attrs.value(value))
                }
                UpdateAction::Increment { field, start, by } => {
                    let name = attrs.name(field);
                    let start = attrs.value(&AttrValue::from(*start));
                    let by = attrs.value(&AttrValue::from(*by));
                    format!("{name} = if_not_exists({name}, {start}) + {by}")
                }
            })
            .collect();

        format!("SET {}", clauses.join(", "))
    }
}
