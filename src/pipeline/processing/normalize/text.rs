use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::constants::MIN_PHONE_DIGITS;
use crate::domain::PropertyType;

/// Lower-cased spelling variants of the cities we see most often.
static CITY_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let groups: &[(&str, &[&str])] = &[
        ("Karachi", &["karachi", "krchi", "khi", "karachi city"]),
        ("Lahore", &["lahore", "lhr", "lahore city"]),
        ("Islamabad", &["islamabad", "isb", "islamabad capital", "ict"]),
        ("Rawalpindi", &["rawalpindi", "rwp", "pindi"]),
        ("Faisalabad", &["faisalabad", "fsd", "lyallpur"]),
        ("Multan", &["multan", "mul"]),
        ("Peshawar", &["peshawar", "psh"]),
    ];

    let mut aliases = HashMap::new();
    for (canonical, variants) in groups {
        for variant in *variants {
            aliases.insert(*variant, *canonical);
        }
    }
    aliases
});

/// Property type synonyms, matched longest first as whole words inside the raw text.
static PROPERTY_TYPE_SYNONYMS: Lazy<Vec<(&'static str, PropertyType)>> = Lazy::new(|| {
    let mut synonyms = vec![
        ("independent house", PropertyType::House),
        ("house", PropertyType::House),
        ("home", PropertyType::House),
        ("bungalow", PropertyType::House),
        ("villa", PropertyType::House),
        ("cottage", PropertyType::House),
        ("townhouse", PropertyType::House),
        ("apartment", PropertyType::Apartment),
        ("flat", PropertyType::Apartment),
        ("unit", PropertyType::Apartment),
        ("condo", PropertyType::Apartment),
        ("plot", PropertyType::Plot),
        ("residential plot", PropertyType::Plot),
        ("commercial plot", PropertyType::Plot),
        ("land", PropertyType::Plot),
        ("vacant land", PropertyType::Plot),
        ("shop", PropertyType::Commercial),
        ("office", PropertyType::Commercial),
        ("warehouse", PropertyType::Commercial),
        ("building", PropertyType::Commercial),
        ("commercial space", PropertyType::Commercial),
        ("plaza", PropertyType::Commercial),
        ("farmhouse", PropertyType::Farmhouse),
        ("farm house", PropertyType::Farmhouse),
        ("penthouse", PropertyType::Penthouse),
        ("penthouse apartment", PropertyType::Penthouse),
        ("studio", PropertyType::Studio),
        ("studio apartment", PropertyType::Studio),
    ];
    synonyms.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    synonyms
});

static TITLE_JUNK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s\-.,()/]").expect("title regex"));

static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("integer regex"));

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%B %d, %Y",
];

pub(crate) fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "dha  PHASE 6" -> "Dha Phase 6"
pub(crate) fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Trim, collapse whitespace, then map known spellings onto one name. Unknown cities
/// pass through title-cased so they still group as their own category.
pub fn canonicalize_city(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    if collapsed.is_empty() {
        return String::new();
    }

    let key = collapsed.to_lowercase();
    let key = key.trim_end_matches(['.', ',']);
    match CITY_ALIASES.get(key) {
        Some(canonical) => canonical.to_string(),
        None => title_case(&collapsed),
    }
}

/// Map free-text property descriptions onto the closed [`PropertyType`] set.
///
/// The canonical string is [`PropertyType::as_str`] (also its `Display`), which is what
/// `CleanedRecord::property_type` and the fingerprint carry.
pub fn canonicalize_property_type(raw: &str) -> PropertyType {
    let normalized: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let normalized = collapse_whitespace(&normalized);
    if normalized.is_empty() {
        return PropertyType::Other;
    }

    PROPERTY_TYPE_SYNONYMS
        .iter()
        .find(|(synonym, _)| contains_word(&normalized, synonym))
        .map(|(_, kind)| *kind)
        .unwrap_or(PropertyType::Other)
}

/// Whole-word containment that also accepts a plural `s`.
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(idx, _)| {
        let before_ok = haystack[..idx].chars().last().map_or(true, |c| c == ' ');
        let rest = &haystack[idx + word.len()..];
        let rest = rest.strip_prefix('s').unwrap_or(rest);
        let after_ok = rest.chars().next().map_or(true, |c| c == ' ');
        before_ok && after_ok
    })
}

fn title_cased_or_absent(raw: &str) -> Option<String> {
    let collapsed = collapse_whitespace(raw);
    if collapsed.is_empty() {
        None
    } else {
        Some(title_case(&collapsed))
    }
}

/// Neighborhood names are title-cased; blank means absent.
pub fn canonicalize_area(raw: &str) -> Option<String> {
    title_cased_or_absent(raw)
}

pub fn clean_title(raw: &str) -> String {
    let stripped = TITLE_JUNK.replace_all(raw, "");
    collapse_whitespace(&stripped)
}

/// Keep digits and `+`; anything shorter than a real number is dropped.
pub fn clean_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
    if cleaned.len() >= MIN_PHONE_DIGITS {
        Some(cleaned)
    } else {
        None
    }
}

pub fn clean_agent_name(raw: &str) -> Option<String> {
    title_cased_or_absent(raw)
}

/// First integer in the text ("3 Beds" -> 3). Zero counts as absent.
pub fn parse_count(raw: &str) -> Option<u32> {
    FIRST_INTEGER
        .find(raw)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n > 0)
}

pub fn parse_date_posted(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Groups the text-level canonicalizations behind one type so the orchestrator can
/// hold it alongside the numeric normalizers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCanonicalizer;

impl TextCanonicalizer {
    pub fn city(&self, raw: Option<&str>) -> String {
        raw.map(canonicalize_city).unwrap_or_default()
    }

    pub fn area(&self, raw: Option<&str>) -> Option<String> {
        raw.and_then(canonicalize_area)
    }

    pub fn property_type(&self, raw: Option<&str>) -> PropertyType {
        raw.map(canonicalize_property_type).unwrap_or(PropertyType::Other)
    }

    pub fn title(&self, raw: Option<&str>) -> String {
        raw.map(clean_title).unwrap_or_default()
    }
}
