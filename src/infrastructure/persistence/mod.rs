//! Record store implementations.
//!
//! Concrete implementations of [`crate::domain::repositories::RecordStore`].
//!
//! # Stores
//!
//! - [`PgRecordStore`] - PostgreSQL table with an atomic `INSERT ... ON CONFLICT DO NOTHING`
//! - [`MemoryRecordStore`] - In-process map for development and tests

pub mod memory_record_store;
pub mod pg_record_store;

pub use memory_record_store::MemoryRecordStore;
pub use pg_record_store::PgRecordStore;
