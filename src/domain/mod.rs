//! Domain layer containing business entities and logic.
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. It defines the data model, the store contract implemented by the
//! infrastructure layer, and the weighted selection algorithm.
//!
//! # Architecture
//!
//! - [`entities`] - Records, targets and weights
//! - [`repositories`] - The [`repositories::RecordStore`] contract
//! - [`selection`] - Weighted random choice of a redirect target
//!
//! # Request Flow
//!
//! 1. The allocator builds a [`entities::Record`] and inserts it through
//!    [`repositories::RecordStore::insert_if_absent`]
//! 2. The selector reads it back with [`repositories::RecordStore::get`]
//! 3. [`entities::Record::weighted_urls`] normalises weights to `f64`
//! 4. [`selection::pick_url`] draws the redirect location

pub mod entities;
pub mod repositories;
pub mod selection;
