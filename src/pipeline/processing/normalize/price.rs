use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{prepare_quantity_text, scan_quantity, within_bounds, RangePolicy, UnitTable};
use crate::constants::DEFAULT_MAX_PRICE_PKR;

/// Local real-estate scale words. Plurals ("lakhs", "crores") are accepted by the table.
static PRICE_SCALES: Lazy<UnitTable> = Lazy::new(|| {
    UnitTable::new(&[
        ("crore", 10_000_000.0),
        ("cr", 10_000_000.0),
        ("million", 1_000_000.0),
        ("mn", 1_000_000.0),
        ("lakh", 100_000.0),
        ("lac", 100_000.0),
        ("thousand", 1_000.0),
        ("k", 1_000.0),
    ])
});

static CURRENCY_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:pkr|rs|inr|usd)\b").expect("currency word regex"));

/// Currency glued to the digits, e.g. "15000000pkr"
static CURRENCY_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)(?:pkr|rs)\b").expect("currency suffix regex"));

static CURRENCY_SYMBOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[₨₹$€£]").expect("currency symbol regex"));

/// Parses free-text prices ("1.5 Crore", "PKR 15,000,000", "50-60 Lakh") into whole PKR.
#[derive(Debug, Clone, Copy)]
pub struct PriceNormalizer {
    pub range_policy: RangePolicy,
    pub max_price_pkr: f64,
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self {
            range_policy: RangePolicy::Midpoint,
            max_price_pkr: DEFAULT_MAX_PRICE_PKR,
        }
    }
}

impl PriceNormalizer {
    pub fn new(range_policy: RangePolicy, max_price_pkr: f64) -> Self {
        Self {
            range_policy,
            max_price_pkr,
        }
    }

    /// Absent (never zero) when nothing usable can be extracted.
    pub fn normalize(&self, raw: &str) -> Option<f64> {
        let text = strip_currency(&prepare_quantity_text(raw));
        let quantity = scan_quantity(&text, &PRICE_SCALES, self.range_policy)?;

        let price = quantity.value.round();

        let accepted = within_bounds(price, self.max_price_pkr);
        if accepted.is_none() {
            debug!(raw = %raw, price, "Rejected out-of-range price");
        }
        accepted
    }
}

fn strip_currency(text: &str) -> String {
    let text = CURRENCY_SYMBOL.replace_all(text, " ");
    let text = CURRENCY_SUFFIX.replace_all(&text, "$1 ");
    let text = CURRENCY_WORD.replace_all(&text, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [`PriceNormalizer`] with the default midpoint range policy and ceiling.
pub fn normalize_price(raw: &str) -> Option<f64> {
    PriceNormalizer::default().normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_words() {
        assert_eq!(normalize_price("1.5 Crore"), Some(15_000_000.0));
        assert_eq!(normalize_price("50 Lakh"), Some(5_000_000.0));
        assert_eq!(normalize_price("500 Thousand"), Some(500_000.0));
        assert_eq!(normalize_price("2.5 million"), Some(2_500_000.0));
        assert_eq!(normalize_price("750k"), Some(750_000.0));
        assert_eq!(normalize_price("85 Lacs"), Some(8_500_000.0));
        assert_eq!(normalize_price("3 Crores"), Some(30_000_000.0));
    }

    #[test]
    fn currency_markers_and_separators_are_ignored() {
        assert_eq!(normalize_price("PKR 15,000,000"), Some(15_000_000.0));
        assert_eq!(normalize_price("Rs. 1.2 Crore"), Some(12_000_000.0));
        assert_eq!(normalize_price("₨ 45 lakh"), Some(4_500_000.0));
        assert_eq!(normalize_price("15000000PKR"), Some(15_000_000.0));
    }

    #[test]
    fn canonical_value_is_idempotent() {
        assert_eq!(normalize_price("15000000"), Some(15_000_000.0));
        let once = normalize_price("1.5 Crore").unwrap();
        assert_eq!(normalize_price(&format!("{}", once)), Some(once));
    }

    #[test]
    fn ranges_take_midpoint_by_default() {
        assert_eq!(normalize_price("50 Lakh - 60 Lakh"), Some(5_500_000.0));
        assert_eq!(normalize_price("50-60 Lakh"), Some(5_500_000.0));
    }

    #[test]
    fn range_policy_is_configurable() {
        let normalizer = PriceNormalizer::new(RangePolicy::Max, DEFAULT_MAX_PRICE_PKR);
        assert_eq!(normalizer.normalize("50 to 60 lakh"), Some(6_000_000.0));
        let normalizer = PriceNormalizer::new(RangePolicy::Min, DEFAULT_MAX_PRICE_PKR);
        assert_eq!(normalizer.normalize("50 to 60 lakh"), Some(5_000_000.0));
    }

    #[test]
    fn range_bounds_with_different_scales() {
        assert_eq!(normalize_price("90 Lakh - 1.2 Crore"), Some(10_500_000.0));
        assert_eq!(normalize_price("Rs 95 lac to 1 crore"), Some(9_750_000.0));
    }

    #[test]
    fn bedroom_count_after_price_is_not_a_range() {
        assert_eq!(normalize_price("1.5 Crore - 2 Bed"), Some(15_000_000.0));
        assert_eq!(normalize_price("45 lakh - 3 baths"), Some(4_500_000.0));
    }

    #[test]
    fn first_scale_word_governs() {
        assert_eq!(normalize_price("1 crore 20 lakh"), Some(10_000_000.0));
    }

    #[test]
    fn rounds_to_whole_units() {
        assert_eq!(normalize_price("1.23456 lakh"), Some(123_456.0));
        assert_eq!(normalize_price("999.6"), Some(1_000.0));
    }

    #[test]
    fn unusable_prices_are_absent_not_zero() {
        assert_eq!(normalize_price(""), None);
        assert_eq!(normalize_price("Call for price"), None);
        assert_eq!(normalize_price("0"), None);
        assert_eq!(normalize_price("0 lakh"), None);
        assert_eq!(normalize_price("-500000"), None);
        assert_eq!(normalize_price("2000000 crore"), None);
    }
}
