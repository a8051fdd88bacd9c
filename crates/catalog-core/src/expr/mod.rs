//! Store expressions.
//!
//! Conditions, updates and projections are modelled as typed values. Wire
//! backends render them through [`ExpressionAttributes`], which binds every
//! field name and value to a generated placeholder so reserved words never
//! reach the expression text. In-process backends evaluate them directly.

mod attributes;
mod condition;
mod update;

pub use attributes::ExpressionAttributes;
pub use condition::Condition;
pub use update::{Update, UpdateAction};
