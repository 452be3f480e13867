//! Field normalizers: free-text price, area and location strings into canonical values.
//!
//! Price and area share the same shape of problem (a numeral, maybe a range, followed by
//! a unit or scale word), so both are driven by [`UnitTable`] plus [`scan_quantity`]. The
//! tables are data, matched longest-alias-first, rather than a chain of `if contains`.

pub mod area;
pub mod price;
pub mod text;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CleanerError;

pub use area::{normalize_area, AreaNormalizer};
pub use price::{normalize_price, PriceNormalizer};
pub use text::{
    canonicalize_area, canonicalize_city, canonicalize_property_type, clean_agent_name,
    clean_phone, clean_title, parse_count, parse_date_posted, TextCanonicalizer,
};

static NUMERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("numeral regex"));

/// How a range such as "50 - 60 Lakh" collapses to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    #[default]
    Midpoint,
    Min,
    Max,
}

impl RangePolicy {
    pub fn combine(self, low: f64, high: f64) -> f64 {
        match self {
            RangePolicy::Midpoint => (low + high) / 2.0,
            RangePolicy::Min => low.min(high),
            RangePolicy::Max => low.max(high),
        }
    }
}

impl FromStr for RangePolicy {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "midpoint" | "mid" => Ok(RangePolicy::Midpoint),
            "min" => Ok(RangePolicy::Min),
            "max" => Ok(RangePolicy::Max),
            other => Err(CleanerError::Config(format!("unknown range policy '{}'", other))),
        }
    }
}

/// Ordered `(alias, factor)` pairs. Construction sorts longest alias first so that
/// "square feet" is tried before "feet" and "sq meter" before "sq m".
#[derive(Debug, Clone)]
pub struct UnitTable {
    entries: Vec<(&'static str, f64)>,
}

impl UnitTable {
    pub fn new(entries: &[(&'static str, f64)]) -> Self {
        let mut entries = entries.to_vec();
        // stable sort keeps declaration order among equal lengths
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { entries }
    }

    /// Match an alias at the very start of `text`. A trailing plural `s` is accepted and
    /// the alias must end on a word boundary. Returns the matched byte length and factor.
    pub fn match_prefix(&self, text: &str) -> Option<(usize, f64)> {
        for (alias, factor) in &self.entries {
            if let Some(rest) = text.strip_prefix(alias) {
                if ends_word(rest) {
                    return Some((alias.len(), *factor));
                }
                if let Some(after_plural) = rest.strip_prefix('s') {
                    if ends_word(after_plural) {
                        return Some((alias.len() + 1, *factor));
                    }
                }
            }
        }
        None
    }
}

fn ends_word(rest: &str) -> bool {
    rest.chars().next().map_or(true, |c| !c.is_alphabetic())
}

/// Lower-case, drop thousands separators, turn stray dots into spaces ("sq. ft.",
/// "Rs.") while keeping decimal points, and collapse whitespace.
pub(crate) fn prepare_quantity_text(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let chars: Vec<char> = lowered.chars().collect();
    let mut out = String::with_capacity(lowered.len());

    for (i, &c) in chars.iter().enumerate() {
        let between_digits = i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).map_or(false, |n| n.is_ascii_digit());
        match c {
            ',' if between_digits => {}
            '.' if between_digits => out.push('.'),
            ',' | '.' | '/' | '(' | ')' => out.push(' '),
            _ => out.push(c),
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A numeral found in the prepared text, with the unit it is attached to, if any.
#[derive(Debug, Clone)]
struct Numeral {
    value: f64,
    start: usize,
    /// End of the numeral, or of its unit when one follows
    tail_end: usize,
    unit: Option<(usize, usize, f64)>,
}

impl Numeral {
    fn factor(&self) -> Option<f64> {
        self.unit.map(|(_, _, factor)| factor)
    }
}

/// Result of scanning a price or area string.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Quantity {
    /// Already multiplied by the unit factor of each bound; the bare numeral when no
    /// unit was recognized
    pub value: f64,
    /// The governing unit token as it appeared in the prepared text
    pub unit_text: Option<String>,
}

/// Find the governing quantity of `text` (already passed through
/// [`prepare_quantity_text`]).
///
/// The numeral attached to the first recognized unit governs; without any unit, the
/// first numeral does. A neighbouring numeral joined by a range separator ("-", "to")
/// forms a range collapsed by `policy`. Each bound is scaled by its own unit, and a
/// bound without one borrows the other's ("50-60 lakh"). A leading minus sign makes
/// the value unusable.
pub(crate) fn scan_quantity(
    text: &str,
    table: &UnitTable,
    policy: RangePolicy,
) -> Option<Quantity> {
    let mut numerals: Vec<Numeral> = Vec::new();
    let mut consumed_until = 0usize;

    for m in NUMERAL.find_iter(text) {
        // digits inside an alias such as "m2" belong to the previous unit
        if m.start() < consumed_until {
            continue;
        }
        let value: f64 = match m.as_str().parse() {
            Ok(v) => v,
            Err(_) => continue,
        };

        let after = &text[m.end()..];
        let skipped = after.len() - after.trim_start().len();
        let unit_start = m.end() + skipped;
        let unit = table
            .match_prefix(&text[unit_start..])
            .map(|(len, factor)| (unit_start, unit_start + len, factor));

        let tail_end = unit.map_or(m.end(), |(_, end, _)| end);
        consumed_until = tail_end;
        numerals.push(Numeral {
            value,
            start: m.start(),
            tail_end,
            unit,
        });
    }

    if numerals.is_empty() {
        return None;
    }

    let anchor = numerals.iter().position(|n| n.unit.is_some()).unwrap_or(0);
    let governing = &numerals[anchor];
    let governing_factor = governing.factor().unwrap_or(1.0);

    let mut first_used = governing;
    let mut value = governing.value * governing_factor;

    if anchor > 0 && is_range_separator(&text[numerals[anchor - 1].tail_end..governing.start]) {
        // anchor is the first numeral with a unit, so the lower bound has none
        let low = &numerals[anchor - 1];
        value = policy.combine(low.value * governing_factor, value);
        first_used = low;
    } else if let Some(high) = numerals.get(anchor + 1) {
        if is_range_separator(&text[governing.tail_end..high.start]) && ends_bound(text, high) {
            let high_factor = high.factor().unwrap_or(governing_factor);
            value = policy.combine(value, high.value * high_factor);
        }
    }

    if has_leading_minus(&text[..first_used.start]) {
        return None;
    }

    Some(Quantity {
        value,
        unit_text: governing.unit.map(|(start, end, _)| text[start..end].to_string()),
    })
}

/// An upper bound must carry its own unit or stand alone; "1.5 crore - 2 bed" is not
/// a range.
fn ends_bound(text: &str, numeral: &Numeral) -> bool {
    numeral.unit.is_some()
        || text[numeral.tail_end..]
            .trim_start()
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphabetic())
}

fn is_range_separator(gap: &str) -> bool {
    matches!(gap.trim(), "-" | "–" | "—" | "~" | "to")
}

fn has_leading_minus(before: &str) -> bool {
    let before = before.trim_end();
    match before.strip_suffix('-') {
        Some(prefix) => prefix
            .trim_end()
            .chars()
            .last()
            .map_or(true, |c| !c.is_alphanumeric()),
        None => false,
    }
}

/// Drop values that are not finite, not positive, or above `ceiling`.
pub(crate) fn within_bounds(value: f64, ceiling: f64) -> Option<f64> {
    if value.is_finite() && value > 0.0 && value <= ceiling {
        Some(value)
    } else {
        None
    }
}
