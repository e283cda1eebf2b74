//! Shared application state injected into every handler.

use axum::http::HeaderValue;
use std::sync::Arc;

use crate::application::services::{AllocationService, RedirectService};
use crate::domain::repositories::RecordStore;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::CodeGenerator;

/// Allocation service over type-erased store and generator.
pub type DynAllocationService = AllocationService<dyn RecordStore, dyn CodeGenerator>;

/// Redirect service over a type-erased store.
pub type DynRedirectService = RedirectService<dyn RecordStore>;

/// Handles shared by all requests.
///
/// The store client is created once by the process entry point and handed in
/// here; handlers never construct or tear it down.
#[derive(Clone)]
pub struct AppState {
    pub allocation_service: Arc<DynAllocationService>,
    pub redirect_service: Arc<DynRedirectService>,
    pub store: Arc<dyn RecordStore>,
    pub cache: Arc<dyn CacheService>,
    /// Value sent in `Access-Control-Allow-Origin` on shorten responses.
    pub cors_allow_origin: HeaderValue,
}

impl AppState {
    /// Wires the services around a store, cache and configured allocation service.
    ///
    /// The allocation service must have been built over the same `store`.
    pub fn new(
        store: Arc<dyn RecordStore>,
        cache: Arc<dyn CacheService>,
        allocation_service: DynAllocationService,
    ) -> Self {
        let redirect_service = RedirectService::new(store.clone(), cache.clone());

        Self {
            allocation_service: Arc::new(allocation_service),
            redirect_service: Arc::new(redirect_service),
            store,
            cache,
            cors_allow_origin: HeaderValue::from_static("*"),
        }
    }

    /// Sets the CORS origin advertised on shorten responses.
    pub fn with_cors_allow_origin(mut self, origin: HeaderValue) -> Self {
        self.cors_allow_origin = origin;
        self
    }
}
