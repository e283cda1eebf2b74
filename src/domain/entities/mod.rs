//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures; the only behaviour they carry is the
//! numeric normalisation needed before a weighted draw.
//!
//! # Entity Types
//!
//! - [`Record`] - A short code and its ordered list of targets
//! - [`Target`] - One destination URL with its relative weight
//! - [`Weight`] - A weight as it was received or stored (JSON number or decimal string)

pub mod record;
pub mod target;

pub use record::Record;
pub use target::{Target, Weight};
