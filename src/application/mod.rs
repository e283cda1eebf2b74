//! Application layer services implementing business logic.
//!
//! Services orchestrate domain operations by coordinating store calls,
//! validation, and selection. They consume the store and generator traits and
//! provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::allocation_service::AllocationService`] - Validation and collision-safe code allocation
//! - [`services::redirect_service::RedirectService`] - Record lookup and weighted target selection

pub mod services;
