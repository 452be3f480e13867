//! Metrics for the cleaning pipeline.
//!
//! Recording goes through the `metrics` facade, so it is a no-op until a recorder is
//! installed with [`init`]. Each pipeline phase owns a submodule of recording functions.

use std::fmt;
use std::sync::OnceLock;
use tracing::{info, warn};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Enum representing all metric names used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Normalize metrics
    NormalizePriceParsed,
    NormalizePriceAbsent,
    NormalizeAreaParsed,
    NormalizeAreaAbsent,
    NormalizePropertyType,

    // Dedup metrics
    DedupDuplicatesFlagged,
    DedupStoreErrors,

    // Quality metrics
    QualityScore,

    // Batch metrics
    PipelineRecordsCleaned,
    PipelineBatchesProcessed,
    PipelineBatchSize,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::NormalizePriceParsed => "listing_normalize_price_parsed_total",
            MetricName::NormalizePriceAbsent => "listing_normalize_price_absent_total",
            MetricName::NormalizeAreaParsed => "listing_normalize_area_parsed_total",
            MetricName::NormalizeAreaAbsent => "listing_normalize_area_absent_total",
            MetricName::NormalizePropertyType => "listing_normalize_property_type_total",
            MetricName::DedupDuplicatesFlagged => "listing_dedup_duplicates_flagged_total",
            MetricName::DedupStoreErrors => "listing_dedup_store_errors_total",
            MetricName::QualityScore => "listing_quality_score",
            MetricName::PipelineRecordsCleaned => "listing_pipeline_records_cleaned_total",
            MetricName::PipelineBatchesProcessed => "listing_pipeline_batches_processed_total",
            MetricName::PipelineBatchSize => "listing_pipeline_batch_size",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            NormalizePriceParsed,
            NormalizePriceAbsent,
            NormalizeAreaParsed,
            NormalizeAreaAbsent,
            NormalizePropertyType,
            DedupDuplicatesFlagged,
            DedupStoreErrors,
            QualityScore,
            PipelineRecordsCleaned,
            PipelineBatchesProcessed,
            PipelineBatchSize,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus recorder. Idempotent; later calls return the first handle.
pub fn init() -> Option<&'static PrometheusHandle> {
    if let Some(handle) = HANDLE.get() {
        return Some(handle);
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus recorder installed");
            Some(HANDLE.get_or_init(|| handle))
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

/// Current metrics in Prometheus text format, if a recorder was installed.
pub fn render() -> Option<String> {
    HANDLE.get().map(|handle| handle.render())
}

// ============================================================================
// Normalize Metrics
// ============================================================================

pub mod normalize {
    use super::MetricName;
    use crate::domain::PropertyType;

    pub fn price(parsed: bool) {
        let name = if parsed {
            MetricName::NormalizePriceParsed
        } else {
            MetricName::NormalizePriceAbsent
        };
        ::metrics::counter!(name.as_str()).increment(1);
    }

    pub fn area(parsed: bool) {
        let name = if parsed {
            MetricName::NormalizeAreaParsed
        } else {
            MetricName::NormalizeAreaAbsent
        };
        ::metrics::counter!(name.as_str()).increment(1);
    }

    pub fn property_type(kind: PropertyType) {
        ::metrics::counter!(
            MetricName::NormalizePropertyType.as_str(),
            "property_type" => kind.as_str()
        )
        .increment(1);
    }
}

// ============================================================================
// Dedup Metrics
// ============================================================================

pub mod dedup {
    use super::MetricName;

    pub fn duplicate_flagged() {
        ::metrics::counter!(MetricName::DedupDuplicatesFlagged.as_str()).increment(1);
    }

    pub fn store_error() {
        ::metrics::counter!(MetricName::DedupStoreErrors.as_str()).increment(1);
    }
}

// ============================================================================
// Quality Metrics
// ============================================================================

pub mod quality {
    use super::MetricName;

    pub fn score_recorded(score: f64) {
        ::metrics::histogram!(MetricName::QualityScore.as_str()).record(score);
    }
}

// ============================================================================
// Pipeline Metrics
// ============================================================================

pub mod pipeline {
    use super::MetricName;

    /// `source_website` is scraped text, so only its host name becomes a label.
    pub fn record_cleaned(source_website: Option<&str>) {
        ::metrics::counter!(
            MetricName::PipelineRecordsCleaned.as_str(),
            "source" => source_label(source_website)
        )
        .increment(1);
    }

    pub fn batch_processed(batch_size: usize) {
        ::metrics::histogram!(MetricName::PipelineBatchSize.as_str()).record(batch_size as f64);
        ::metrics::counter!(MetricName::PipelineBatchesProcessed.as_str()).increment(1);
    }

    /// "https://www.Zameen.com/Homes/x" -> "zameen.com". Anything that does not look like
    /// a host name collapses into "other".
    pub(crate) fn source_label(source_website: Option<&str>) -> String {
        let raw = match source_website {
            Some(raw) => raw.trim().to_ascii_lowercase(),
            None => return "unknown".to_string(),
        };
        let without_scheme = raw
            .strip_prefix("https://")
            .or_else(|| raw.strip_prefix("http://"))
            .unwrap_or(&raw);
        let host = without_scheme
            .split(['/', ':', '?', '#'])
            .next()
            .unwrap_or("");
        let host = host.strip_prefix("www.").unwrap_or(host);

        let looks_like_host = !host.is_empty()
            && host.len() <= MAX_HOST_LABEL_LEN
            && host.contains('.')
            && host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
        if looks_like_host {
            host.to_string()
        } else {
            "other".to_string()
        }
    }

    const MAX_HOST_LABEL_LEN: usize = 64;
}
