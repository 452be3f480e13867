//! Cleaning pipeline for scraped real-estate listings.
//!
//! Raw listings go through price, area and text normalization, get a content
//! fingerprint for cross-source dedup, and receive an advisory completeness score.
//! Scraping and persistence live outside this crate and talk to it through
//! [`domain::RawRecord`], [`domain::CleanedRecord`] and [`app::SeenFingerprints`].

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;

// Domain data shapes shared across layers
pub mod domain;

// Ports and their adapters
pub mod app;
pub mod infra;

pub mod observability;

pub use config::CleanerConfig;
pub use domain::{CleanedRecord, PropertyType, RawRecord};
pub use error::{CleanerError, Result};
pub use pipeline::processing::compute_fingerprint;
// `canonicalize_property_type` yields `PropertyType`; `as_str()`/`Display` give the canonical name
pub use pipeline::processing::normalize::{
    canonicalize_city, canonicalize_property_type, normalize_area, normalize_price, RangePolicy,
};
pub use pipeline::processing::quality_gate::score;
pub use pipeline::{clean_batch, clean_single, CleaningPipeline, CleaningReport};
