//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`RecordStore`] - Conditional insert and point lookup of short code records
//!
//! # Testing
//!
//! See `tests/repository_record.rs` for the PostgreSQL implementation.

pub mod record_store;

pub use record_store::{RecordStore, StoreError, StoreResult};

#[cfg(test)]
pub use record_store::MockRecordStore;
