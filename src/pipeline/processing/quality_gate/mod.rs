//! Completeness scoring.
//!
//! The score is advisory: it feeds filtering and ranking downstream and never causes a
//! record to be rejected here.

use crate::constants::{OPTIONAL_GROUP_WEIGHT, REQUIRED_GROUP_WEIGHT};
use crate::domain::CanonicalListing;

/// Fields that carry the 0.70 required weight, in scoring order.
pub const REQUIRED_FIELDS: [&str; 5] = ["title", "city", "price_pkr", "property_type", "area_size"];

/// Fields that carry the 0.30 optional weight.
pub const OPTIONAL_FIELDS: [&str; 5] =
    ["area", "bedrooms", "bathrooms", "agent_name", "contact_phone"];

/// Trait for scoring a canonicalized listing
pub trait QualityScorer {
    /// Score in `[0.0, 1.0]`
    fn score(&self, listing: &CanonicalListing) -> f64;
}

/// Weighted completeness over the required and optional field groups.
#[derive(Debug, Clone)]
pub struct CompletenessScorer {
    pub required_weight: f64,
    pub optional_weight: f64,
}

impl Default for CompletenessScorer {
    fn default() -> Self {
        Self {
            required_weight: REQUIRED_GROUP_WEIGHT,
            optional_weight: OPTIONAL_GROUP_WEIGHT,
        }
    }
}

impl QualityScorer for CompletenessScorer {
    fn score(&self, listing: &CanonicalListing) -> f64 {
        let (required, optional) = presence(listing);
        let required_hits = required.iter().filter(|p| **p).count() as f64;
        let optional_hits = optional.iter().filter(|p| **p).count() as f64;

        let raw = required_hits * (self.required_weight / REQUIRED_FIELDS.len() as f64)
            + optional_hits * (self.optional_weight / OPTIONAL_FIELDS.len() as f64);

        // two decimals, so 5 x 0.14 reads as 0.70 rather than 0.7000000000000001
        ((raw * 100.0).round() / 100.0).clamp(0.0, 1.0)
    }
}

fn non_blank(s: &str) -> bool {
    !s.trim().is_empty()
}

fn presence(listing: &CanonicalListing) -> ([bool; 5], [bool; 5]) {
    let required = [
        non_blank(&listing.title),
        non_blank(&listing.city),
        listing.price_pkr.is_some(),
        non_blank(&listing.property_type),
        listing.area_size.is_some(),
    ];
    let optional = [
        listing.area.as_deref().map_or(false, non_blank),
        listing.bedrooms.is_some(),
        listing.bathrooms.is_some(),
        listing.agent_name.as_deref().map_or(false, non_blank),
        listing.contact_phone.as_deref().map_or(false, non_blank),
    ];
    (required, optional)
}

/// Score with the default 0.70 / 0.30 weights.
pub fn score(listing: &CanonicalListing) -> f64 {
    CompletenessScorer::default().score(listing)
}

/// Names of scored fields that are absent, required ones first.
pub fn missing_fields(listing: &CanonicalListing) -> Vec<&'static str> {
    let (required, optional) = presence(listing);
    REQUIRED_FIELDS
        .iter()
        .zip(required)
        .chain(OPTIONAL_FIELDS.iter().zip(optional))
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect()
}

/// Minimum a listing needs to be worth showing: a title, a city, and at least one of
/// price or area. Only reported, never enforced.
pub fn is_listable(listing: &CanonicalListing) -> bool {
    non_blank(&listing.title)
        && non_blank(&listing.city)
        && (listing.price_pkr.is_some() || listing.area_size.is_some())
}
