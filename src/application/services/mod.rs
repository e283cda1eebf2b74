//! Business logic services for the application layer.

pub mod allocation_service;
pub mod redirect_service;

pub use allocation_service::{AllocationService, DEFAULT_MAX_ATTEMPTS, DEFAULT_SHORT_URL_BASE};
pub use redirect_service::RedirectService;
