//! Store contract for short code records.

use crate::domain::entities::Record;
use async_trait::async_trait;

/// Errors reported by a [`RecordStore`].
///
/// `AlreadyExists` is an expected outcome of a conditional insert and must
/// never be confused with `Unavailable`, which covers throttling, network and
/// connection faults.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("short code '{0}' already exists")]
    AlreadyExists(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("stored record is malformed: {0}")]
    Malformed(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value store mapping a short code to its [`Record`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRecordStore`] - PostgreSQL table
/// - [`crate::infrastructure::persistence::MemoryRecordStore`] - in-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts `record` only if no record exists for `record.short_code`.
    ///
    /// The existence check and the write must be a single atomic operation
    /// against the backing store; concurrent allocators rely on it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the code is taken.
    /// Returns [`StoreError::Unavailable`] on infrastructure failures.
    async fn insert_if_absent(&self, record: &Record) -> StoreResult<()>;

    /// Looks up a record by short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Record))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on infrastructure failures and
    /// [`StoreError::Malformed`] if the stored row cannot be decoded.
    async fn get(&self, short_code: &str) -> StoreResult<Option<Record>>;

    /// Checks if the backing store is reachable.
    async fn health_check(&self) -> bool;
}
