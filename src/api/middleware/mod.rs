//! HTTP middleware for request processing.
//!
//! Provides CORS headers for the shorten API and request tracing.

pub mod cors;
pub mod tracing;
