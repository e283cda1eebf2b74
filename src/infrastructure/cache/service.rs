//! Cache service trait and error types.

use async_trait::async_trait;

use crate::domain::entities::Record;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache for short code records.
///
/// Records are immutable once inserted, so a cached copy never goes stale; the
/// TTL only bounds memory use. Implementations must be fail-open: a cache
/// failure degrades to a store lookup and never fails the request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a cached record.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_record(&self, short_code: &str) -> CacheResult<Option<Record>>;

    /// Stores a record with an optional TTL in seconds (implementation default if `None`).
    ///
    /// Implementations should log errors and return `Ok(())`.
    async fn set_record(&self, record: &Record, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
