//! Command implementations.

pub mod photos;
pub mod profile;
pub mod stats;
pub mod visitors;
