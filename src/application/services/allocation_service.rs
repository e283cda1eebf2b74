//! Short code allocation service.

use std::sync::Arc;

use metrics::counter;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::domain::entities::{Record, Target};
use crate::domain::repositories::{RecordStore, StoreError};
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::payload::{build_targets, validate_body};

/// Number of insert attempts before allocation gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Base of the public short URL unless configured otherwise.
pub const DEFAULT_SHORT_URL_BASE: &str = "https://short.ly";

/// Service for creating short links.
///
/// Allocation relies entirely on the store's conditional insert for
/// uniqueness: a candidate is generated, inserted if absent, and a collision
/// simply moves on to the next candidate. There is no application-level lock.
pub struct AllocationService<S: RecordStore + ?Sized, G: CodeGenerator + ?Sized> {
    store: Arc<S>,
    generator: Arc<G>,
    max_attempts: usize,
    short_url_base: String,
}

impl<S: RecordStore + ?Sized, G: CodeGenerator + ?Sized> AllocationService<S, G> {
    /// Creates a new allocation service with default limits.
    pub fn new(store: Arc<S>, generator: Arc<G>) -> Self {
        Self {
            store,
            generator,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            short_url_base: DEFAULT_SHORT_URL_BASE.to_string(),
        }
    }

    /// Sets the number of insert attempts made before giving up.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the base used by [`Self::short_url`].
    pub fn with_short_url_base(mut self, base: impl Into<String>) -> Self {
        self.short_url_base = base.into();
        self
    }

    /// Validates a shorten request body and allocates a code for its targets.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] naming the first invalid field, and
    /// any error from [`Self::allocate`].
    pub async fn create_short_link(&self, body: &Value) -> Result<Record, AppError> {
        let entries = validate_body(body).map_err(AppError::Validation)?;
        let targets = build_targets(entries);

        self.allocate(targets).await
    }

    /// Inserts `targets` under a freshly generated, unused short code.
    ///
    /// # Retry Policy
    ///
    /// Each attempt generates a new candidate and issues one conditional
    /// insert. Only collisions are retried; a store fault ends the loop
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on the first store fault.
    /// Returns [`AppError::ExhaustedRetries`] if every attempt collided.
    pub async fn allocate(&self, targets: Vec<Target>) -> Result<Record, AppError> {
        let mut record = Record::new(String::new(), targets);

        for attempt in 1..=self.max_attempts {
            record.short_code = self.generator.generate();

            match self.store.insert_if_absent(&record).await {
                Ok(()) => {
                    info!(short_code = %record.short_code, attempt, "Short code created");
                    counter!("shortener_allocations_total", "outcome" => "created").increment(1);
                    return Ok(record);
                }
                Err(StoreError::AlreadyExists(_)) => {
                    warn!(short_code = %record.short_code, attempt, "Collision, retrying");
                    counter!("shortener_collisions_total").increment(1);
                }
                Err(e) => {
                    error!(short_code = %record.short_code, attempt, error = %e, "Store insert failed");
                    counter!("shortener_allocations_total", "outcome" => "store_error").increment(1);
                    return Err(e.into());
                }
            }
        }

        error!(
            attempts = self.max_attempts,
            "Failed to generate a unique short code"
        );
        counter!("shortener_allocations_total", "outcome" => "exhausted").increment(1);

        Err(AppError::ExhaustedRetries {
            attempts: self.max_attempts,
        })
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.short_url_base.trim_end_matches('/'), short_code)
    }
}
