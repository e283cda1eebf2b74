//! Short code resolution and weighted redirect selection.

use std::sync::Arc;

use metrics::counter;
use rand::Rng;
use tracing::{debug, error};

use crate::domain::entities::Record;
use crate::domain::repositories::RecordStore;
use crate::domain::selection::pick_url;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Service resolving a short code to one of its target URLs.
pub struct RedirectService<S: RecordStore + ?Sized> {
    store: Arc<S>,
    cache: Arc<dyn CacheService>,
}

impl<S: RecordStore + ?Sized> RedirectService<S> {
    /// Creates a new redirect service.
    pub fn new(store: Arc<S>, cache: Arc<dyn CacheService>) -> Self {
        Self { store, cache }
    }

    /// Resolves a short code to a redirect location using the thread-local RNG.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_with`].
    pub async fn resolve(&self, short_code: Option<&str>) -> Result<String, AppError> {
        let record = self.lookup(short_code).await?;
        choose_location(&record, &mut rand::rng())
    }

    /// Resolves a short code to a redirect location using the given RNG.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MissingInput`] if the code is absent or empty.
    /// Returns [`AppError::NotFound`] if no record exists for the code.
    /// Returns [`AppError::StoreUnavailable`] on store faults.
    /// Returns [`AppError::Internal`] if the record's weights cannot be sampled.
    pub async fn resolve_with<R: Rng + ?Sized>(
        &self,
        short_code: Option<&str>,
        rng: &mut R,
    ) -> Result<String, AppError> {
        let record = self.lookup(short_code).await?;
        choose_location(&record, rng)
    }

    /// Validates the code and fetches its record.
    async fn lookup(&self, short_code: Option<&str>) -> Result<Record, AppError> {
        let short_code = short_code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AppError::missing_input("Missing short code"))?;

        let record = self.find_record(short_code).await;
        let outcome = match &record {
            Ok(_) => "found",
            Err(AppError::NotFound(_)) => "not_found",
            Err(_) => "error",
        };
        counter!("shortener_redirects_total", "outcome" => outcome).increment(1);

        record
    }

    /// Retrieves a record through the cache, falling back to the store.
    ///
    /// # Cache Strategy
    ///
    /// - **Cache hit**: served without touching the store
    /// - **Cache miss**: read the store, then populate the cache in the background
    /// - **Cache error**: logged and treated as a miss
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record exists for the code.
    pub async fn find_record(&self, short_code: &str) -> Result<Record, AppError> {
        match self.cache.get_record(short_code).await {
            Ok(Some(record)) => return Ok(record),
            Ok(None) => debug!("Cache MISS for {}", short_code),
            Err(e) => error!("Cache error: {}", e),
        }

        let record = self
            .store
            .get(short_code)
            .await?
            .ok_or_else(|| AppError::not_found("Short code not found"))?;

        let cache = self.cache.clone();
        let cached = record.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.set_record(&cached, None).await {
                error!("Failed to cache record: {}", e);
            }
        });

        Ok(record)
    }
}

/// Normalises the record's weights and draws one target URL.
fn choose_location<R: Rng + ?Sized>(record: &Record, rng: &mut R) -> Result<String, AppError> {
    let candidates = record.weighted_urls()?;
    let url = pick_url(&candidates, rng)?;

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Target, Weight};
    use crate::domain::repositories::{MockRecordStore, StoreError};
    use crate::infrastructure::cache::{CacheError, MockCacheService, NullCache};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn service_with(store: MockRecordStore) -> RedirectService<MockRecordStore> {
        RedirectService::new(Arc::new(store), Arc::new(NullCache::new()))
    }

    fn store_returning(record: Record) -> MockRecordStore {
        let mut store = MockRecordStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(record.clone())));
        store
    }

    #[tokio::test]
    async fn test_missing_code_is_rejected_without_lookup() {
        let mut store = MockRecordStore::new();
        store.expect_get().times(0);
        let service = service_with(store);

        for code in [None, Some("")] {
            let result = service.resolve(code).await;
            assert!(matches!(result, Err(AppError::MissingInput(message)) if message == "Missing short code"));
        }
    }

    #[tokio::test]
    async fn test_code_is_looked_up_verbatim() {
        let mut store = MockRecordStore::new();
        store
            .expect_get()
            .withf(|code| code == " abc12 ")
            .times(1)
            .returning(|_| Ok(None));

        let result = service_with(store).resolve(Some(" abc12 ")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let mut store = MockRecordStore::new();
        store
            .expect_get()
            .withf(|code| code == "abc12")
            .times(1)
            .returning(|_| Ok(None));

        let result = service_with(store).resolve(Some("abc12")).await;
        assert!(matches!(result, Err(AppError::NotFound(message)) if message == "Short code not found"));
    }

    #[tokio::test]
    async fn test_store_fault_is_propagated() {
        let mut store = MockRecordStore::new();
        store
            .expect_get()
            .returning(|_| Err(StoreError::Unavailable("timeout".to_string())));

        let result = service_with(store).resolve(Some("abc12")).await;
        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_single_target_resolves_to_its_url() {
        let record = Record::new("abc12", vec![Target::new("https://example.com", 1u64)]);
        let service = service_with(store_returning(record));

        assert_eq!(
            service.resolve(Some("abc12")).await.unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn test_weighted_distribution_is_respected() {
        let record = Record::new(
            "abc12",
            vec![
                Target::new("https://a.com", 1000u64),
                Target::new("https://b.com", 1u64),
            ],
        );
        let service = service_with(store_returning(record));
        let mut rng = StdRng::seed_from_u64(42);

        let mut heavy = 0;
        for _ in 0..100 {
            if service.resolve_with(Some("abc12"), &mut rng).await.unwrap() == "https://a.com" {
                heavy += 1;
            }
        }

        assert!(heavy > 90, "heavy target chosen only {heavy} times");
    }

    #[tokio::test]
    async fn test_decimal_weights_from_storage_do_not_fail() {
        let record = Record::new(
            "abc12",
            vec![
                Target::new("https://a.com", Weight::Decimal("70".to_string())),
                Target::new("https://b.com", Weight::Decimal("30.0".to_string())),
            ],
        );
        let service = service_with(store_returning(record));

        let url = service.resolve(Some("abc12")).await.unwrap();
        assert!(url == "https://a.com" || url == "https://b.com");
    }

    #[tokio::test]
    async fn test_zero_total_weight_is_internal_error() {
        let record = Record::new(
            "abc12",
            vec![
                Target::new("https://a.com", 0u64),
                Target::new("https://b.com", 0u64),
            ],
        );
        let service = service_with(store_returning(record));

        let result = service.resolve(Some("abc12")).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_store() {
        let record = Record::new("abc12", vec![Target::new("https://cached.com", 1u64)]);

        let mut cache = MockCacheService::new();
        cache
            .expect_get_record()
            .withf(|code| code == "abc12")
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));
        cache.expect_set_record().times(0);

        let mut store = MockRecordStore::new();
        store.expect_get().times(0);

        let service = RedirectService::new(Arc::new(store), Arc::new(cache));

        assert_eq!(
            service.resolve(Some("abc12")).await.unwrap(),
            "https://cached.com"
        );
    }

    #[tokio::test]
    async fn test_cache_miss_reads_store_and_fills_cache() {
        let (filled_tx, mut filled_rx) = tokio::sync::mpsc::unbounded_channel();

        let mut cache = MockCacheService::new();
        cache.expect_get_record().times(1).returning(|_| Ok(None));
        cache
            .expect_set_record()
            .times(1)
            .returning(move |record, ttl| {
                filled_tx.send((record.short_code.clone(), ttl)).unwrap();
                Ok(())
            });

        let record = Record::new("abc12", vec![Target::new("https://stored.com", 1u64)]);
        let mut store = MockRecordStore::new();
        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = RedirectService::new(Arc::new(store), Arc::new(cache));

        assert_eq!(
            service.resolve(Some("abc12")).await.unwrap(),
            "https://stored.com"
        );
        assert_eq!(
            filled_rx.recv().await.unwrap(),
            ("abc12".to_string(), None)
        );
    }

    #[tokio::test]
    async fn test_cache_error_falls_back_to_store() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get_record()
            .times(1)
            .returning(|_| Err(CacheError::ConnectionError("refused".to_string())));
        cache.expect_set_record().returning(|_, _| Ok(()));

        let record = Record::new("abc12", vec![Target::new("https://stored.com", 1u64)]);
        let mut store = MockRecordStore::new();
        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let service = RedirectService::new(Arc::new(store), Arc::new(cache));

        assert_eq!(
            service.resolve(Some("abc12")).await.unwrap(),
            "https://stored.com"
        );
    }

    #[tokio::test]
    async fn test_cache_miss_on_unknown_code_does_not_fill_cache() {
        let mut cache = MockCacheService::new();
        cache.expect_get_record().returning(|_| Ok(None));
        cache.expect_set_record().times(0);

        let mut store = MockRecordStore::new();
        store.expect_get().times(1).returning(|_| Ok(None));

        let service = RedirectService::new(Arc::new(store), Arc::new(cache));

        let result = service.resolve(Some("abc12")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
