//! DTOs for link shortening endpoint.
//!
//! The request body is not described by a DTO: it is validated as raw JSON by
//! [`crate::utils::payload::validate_body`] so errors can name entry indexes.

use serde::Serialize;

use crate::domain::entities::{Record, Target};

/// Response for a successfully created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub targets: Vec<Target>,
}

impl ShortenResponse {
    pub fn new(record: Record, short_url: String) -> Self {
        Self {
            short_code: record.short_code,
            short_url,
            targets: record.targets,
        }
    }
}
