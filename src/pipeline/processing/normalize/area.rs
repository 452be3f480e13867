use once_cell::sync::Lazy;
use tracing::debug;

use super::{prepare_quantity_text, scan_quantity, within_bounds, RangePolicy, UnitTable};
use crate::constants::DEFAULT_MAX_AREA_SQFT;

pub const SQFT_PER_MARLA: f64 = 272.25;
pub const SQFT_PER_KANAL: f64 = 5445.0;
pub const SQFT_PER_SQ_YARD: f64 = 9.0;
pub const SQFT_PER_SQ_METER: f64 = 10.7639;
pub const SQFT_PER_ACRE: f64 = 43560.0;

/// Every alias maps straight to its square-feet factor. Plural `s` is handled by the table.
static AREA_UNITS: Lazy<UnitTable> = Lazy::new(|| {
    UnitTable::new(&[
        ("square feet", 1.0),
        ("square foot", 1.0),
        ("square yard", SQFT_PER_SQ_YARD),
        ("square meter", SQFT_PER_SQ_METER),
        ("square metre", SQFT_PER_SQ_METER),
        ("sq feet", 1.0),
        ("sq foot", 1.0),
        ("sq ft", 1.0),
        ("sqft", 1.0),
        ("ft2", 1.0),
        ("feet", 1.0),
        ("foot", 1.0),
        ("ft", 1.0),
        ("sq yard", SQFT_PER_SQ_YARD),
        ("sq yd", SQFT_PER_SQ_YARD),
        ("sqyd", SQFT_PER_SQ_YARD),
        ("yard", SQFT_PER_SQ_YARD),
        ("yd", SQFT_PER_SQ_YARD),
        ("gaz", SQFT_PER_SQ_YARD),
        ("sq meter", SQFT_PER_SQ_METER),
        ("sq metre", SQFT_PER_SQ_METER),
        ("sq m", SQFT_PER_SQ_METER),
        ("sqm", SQFT_PER_SQ_METER),
        ("m2", SQFT_PER_SQ_METER),
        ("marla", SQFT_PER_MARLA),
        ("kanal", SQFT_PER_KANAL),
        ("acre", SQFT_PER_ACRE),
    ])
});

/// Parses free-text areas ("10 Marla", "1 Kanal", "1,200 sq. ft.") into square feet.
#[derive(Debug, Clone, Copy)]
pub struct AreaNormalizer {
    pub range_policy: RangePolicy,
    pub max_area_sqft: f64,
}

impl Default for AreaNormalizer {
    fn default() -> Self {
        Self {
            range_policy: RangePolicy::Midpoint,
            max_area_sqft: DEFAULT_MAX_AREA_SQFT,
        }
    }
}

impl AreaNormalizer {
    pub fn new(range_policy: RangePolicy, max_area_sqft: f64) -> Self {
        Self {
            range_policy,
            max_area_sqft,
        }
    }

    /// Returns the size in square feet and the unit token that was matched. Both are
    /// absent when either the numeral or the unit is missing, or the size is unusable.
    pub fn normalize(&self, raw: &str) -> (Option<f64>, Option<String>) {
        let text = prepare_quantity_text(raw);
        let quantity = match scan_quantity(&text, &AREA_UNITS, self.range_policy) {
            Some(q) => q,
            None => return (None, None),
        };

        let unit = match quantity.unit_text {
            Some(unit) => unit,
            None => {
                debug!(raw = %raw, "No recognized area unit");
                return (None, None);
            }
        };

        // four decimals is well below any real survey precision and hides float noise
        let size = (quantity.value * 10_000.0).round() / 10_000.0;
        match within_bounds(size, self.max_area_sqft) {
            Some(size) => (Some(size), Some(unit)),
            None => {
                debug!(raw = %raw, size, "Rejected out-of-range area");
                (None, None)
            }
        }
    }
}

/// [`AreaNormalizer`] with the default midpoint range policy and ceiling.
pub fn normalize_area(raw: &str) -> (Option<f64>, Option<String>) {
    AreaNormalizer::default().normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(raw: &str) -> Option<f64> {
        normalize_area(raw).0
    }

    #[test]
    fn local_units() {
        assert_eq!(size("10 Marla"), Some(2722.5));
        assert_eq!(size("1 Kanal"), Some(5445.0));
        assert_eq!(size("2 Kanals"), Some(10_890.0));
        assert_eq!(size("20 marla"), size("1 kanal"));
    }

    #[test]
    fn imperial_and_metric_units() {
        assert_eq!(size("1200 sq ft"), Some(1200.0));
        assert_eq!(size("1,200 Sq. Ft."), Some(1200.0));
        assert_eq!(size("1200sqft"), Some(1200.0));
        assert_eq!(size("1200 square feet"), Some(1200.0));
        assert_eq!(size("200 Sq. Yd."), Some(1800.0));
        assert_eq!(size("120 square yards"), Some(1080.0));
        assert_eq!(size("100 sq m"), Some(1076.39));
        assert_eq!(size("100 m2"), Some(1076.39));
        assert_eq!(size("2 Acres"), Some(87_120.0));
    }

    #[test]
    fn unit_token_is_retained() {
        assert_eq!(normalize_area("10 Marlas"), (Some(2722.5), Some("marlas".to_string())));
        assert_eq!(normalize_area("1200 Square Feet").1.as_deref(), Some("square feet"));
    }

    #[test]
    fn ranges_use_midpoint() {
        assert_eq!(size("5-10 Marla"), Some(7.5 * SQFT_PER_MARLA));
        assert_eq!(size("10 Marla - 12 Marla"), Some(11.0 * SQFT_PER_MARLA));
    }

    #[test]
    fn range_bounds_with_different_units() {
        assert_eq!(
            normalize_area("10 Marla - 1 Kanal"),
            (Some(4083.75), Some("marla".to_string()))
        );
        assert_eq!(size("1 kanal to 2722.5 sq ft"), Some(4083.75));
    }

    #[test]
    fn missing_numeral_or_unit_is_absent() {
        assert_eq!(normalize_area("1200"), (None, None));
        assert_eq!(normalize_area("Marla"), (None, None));
        assert_eq!(normalize_area("spacious corner"), (None, None));
        assert_eq!(normalize_area(""), (None, None));
    }

    #[test]
    fn non_positive_area_is_absent() {
        assert_eq!(normalize_area("0 marla"), (None, None));
        assert_eq!(normalize_area("-5 kanal"), (None, None));
    }

    #[test]
    fn absurd_area_is_absent() {
        let normalizer = AreaNormalizer::new(RangePolicy::Midpoint, 1_000_000.0);
        assert_eq!(normalizer.normalize("500 kanal"), (None, None));
        assert!(normalizer.normalize("50 kanal").0.is_some());
    }
}
