use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A listing exactly as a scraper produced it. Every field is untrusted free text
/// and any of them may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawRecord {
    pub title: Option<String>,
    pub price_raw: Option<String>,
    pub area_raw: Option<String>,
    pub city: Option<String>,
    /// Neighborhood, e.g. "DHA Phase 6"
    pub area: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub agent_name: Option<String>,
    pub contact_phone: Option<String>,
    pub source_website: Option<String>,
    pub source_url: Option<String>,
    pub listing_id: Option<String>,
    pub date_posted: Option<String>,
}

/// Closed set of property categories used for grouping downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    House,
    Apartment,
    Plot,
    Commercial,
    Farmhouse,
    Penthouse,
    Studio,
    Other,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Apartment => "Apartment",
            PropertyType::Plot => "Plot",
            PropertyType::Commercial => "Commercial",
            PropertyType::Farmhouse => "Farmhouse",
            PropertyType::Penthouse => "Penthouse",
            PropertyType::Studio => "Studio",
            PropertyType::Other => crate::constants::OTHER_PROPERTY_TYPE,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record after price, area and text normalization but before identity and
/// scoring have been attached. Fingerprinting and quality scoring both read this.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalListing {
    pub title: String,
    pub city: String,
    pub area: Option<String>,
    pub property_type: String,
    pub price_pkr: Option<f64>,
    pub area_size: Option<f64>,
    pub area_unit_raw: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub agent_name: Option<String>,
    pub contact_phone: Option<String>,
    pub date_posted: Option<NaiveDate>,
}

impl CanonicalListing {
    /// Price per square foot, only when both sides are usable
    pub fn price_per_sqft(&self) -> Option<f64> {
        match (self.price_pkr, self.area_size) {
            (Some(price), Some(size)) if size > 0.0 => Some(price / size),
            _ => None,
        }
    }
}

/// Final output of the pipeline, created once per [`RawRecord`] and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanedRecord {
    pub title: String,
    pub price_raw: Option<String>,
    pub price_pkr: Option<f64>,
    pub price_per_sqft: Option<f64>,
    pub area_raw: Option<String>,
    pub area_size: Option<f64>,
    pub area_unit_raw: Option<String>,
    pub city: String,
    pub area: Option<String>,
    pub property_type: String,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub agent_name: Option<String>,
    pub contact_phone: Option<String>,
    pub source_website: Option<String>,
    pub source_url: Option<String>,
    pub listing_id: Option<String>,
    pub date_posted: Option<String>,
    pub date_posted_parsed: Option<NaiveDate>,
    pub content_hash: String,
    pub is_duplicate: bool,
    pub data_quality_score: f64,
}

impl CleanedRecord {
    /// Assemble the final record from its parts. Provenance strings are carried over
    /// from the raw record untouched.
    pub fn assemble(
        raw: &RawRecord,
        canonical: CanonicalListing,
        content_hash: String,
        is_duplicate: bool,
        data_quality_score: f64,
    ) -> Self {
        let price_per_sqft = canonical.price_per_sqft();
        Self {
            title: canonical.title,
            price_raw: raw.price_raw.clone(),
            price_pkr: canonical.price_pkr,
            price_per_sqft,
            area_raw: raw.area_raw.clone(),
            area_size: canonical.area_size,
            area_unit_raw: canonical.area_unit_raw,
            city: canonical.city,
            area: canonical.area,
            property_type: canonical.property_type,
            bedrooms: canonical.bedrooms,
            bathrooms: canonical.bathrooms,
            agent_name: canonical.agent_name,
            contact_phone: canonical.contact_phone,
            source_website: raw.source_website.clone(),
            source_url: raw.source_url.clone(),
            listing_id: raw.listing_id.clone(),
            date_posted: raw.date_posted.clone(),
            date_posted_parsed: canonical.date_posted,
            content_hash,
            is_duplicate,
            data_quality_score,
        }
    }
}
