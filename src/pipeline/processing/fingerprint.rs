use sha2::{Digest, Sha256};

use crate::constants::{ABSENT_SENTINEL, FINGERPRINT_DELIMITER};
use crate::domain::CanonicalListing;

/// Identity digest of a listing, computed from canonical fields only so that
/// "1.5 Crore" on one site and "PKR 15,000,000" on another hash the same.
///
/// Field order is fixed: title, city, area, price (whole units), area size (one
/// decimal), property type. Absent numbers become a sentinel. Output is 64 lowercase
/// hex characters (SHA-256).
pub fn compute_fingerprint(listing: &CanonicalListing) -> String {
    let price = listing
        .price_pkr
        .map(|p| format!("{:.0}", p.round()))
        .unwrap_or_else(|| ABSENT_SENTINEL.to_string());
    let area_size = listing
        .area_size
        .map(|a| format!("{:.1}", a))
        .unwrap_or_else(|| ABSENT_SENTINEL.to_string());

    let fields = [
        listing.title.as_str(),
        listing.city.as_str(),
        listing.area.as_deref().unwrap_or(""),
        price.as_str(),
        area_size.as_str(),
        listing.property_type.as_str(),
    ];

    let mut s = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            s.push(FINGERPRINT_DELIMITER);
        }
        s.push_str(&field.trim().to_lowercase());
    }

    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}
