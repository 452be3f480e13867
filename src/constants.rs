//! Shared constants for the cleaning pipeline.
//!
//! Conversion and alias tables live next to the normalizers that use them; this module
//! only holds values that more than one stage needs to agree on.

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "cleaner.toml";

/// Anything above 10^12 PKR is treated as a scraping artifact
pub const DEFAULT_MAX_PRICE_PKR: f64 = 1e12;

/// Larger than any plausible land parcel in sq ft
pub const DEFAULT_MAX_AREA_SQFT: f64 = 1e10;

/// ASCII unit separator; never appears in scraped listing text
pub const FINGERPRINT_DELIMITER: char = '\u{1f}';

/// Stands in for an absent price or area inside the fingerprint input
pub const ABSENT_SENTINEL: &str = "-";

/// Weight of the required-field group in the quality score
pub const REQUIRED_GROUP_WEIGHT: f64 = 0.70;

/// Weight of the optional-field group in the quality score
pub const OPTIONAL_GROUP_WEIGHT: f64 = 0.30;

/// Category used when a property type cannot be mapped
pub const OTHER_PROPERTY_TYPE: &str = "Other";

/// Phone numbers shorter than this after cleaning are dropped
pub const MIN_PHONE_DIGITS: usize = 10;
