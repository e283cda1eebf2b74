//! Utility functions for code generation and request payload handling.
//!
//! - [`code_generator`] - Short code generation over the base-62 alphabet
//! - [`payload`] - Shorten request validation and target construction

pub mod code_generator;
pub mod payload;
