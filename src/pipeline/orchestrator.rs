use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::app::ports::SeenFingerprints;
use crate::config::CleanerConfig;
use crate::domain::{CanonicalListing, CleanedRecord, RawRecord};
use crate::error::Result;
use crate::infra::{InMemorySeenFingerprints, SqliteSeenFingerprints};
use crate::observability::metrics;
use crate::pipeline::processing::normalize::{
    clean_agent_name, clean_phone, parse_count, parse_date_posted, AreaNormalizer,
    PriceNormalizer, TextCanonicalizer,
};
use crate::pipeline::processing::quality_gate::{self, CompletenessScorer, QualityScorer};
use crate::pipeline::processing::{compute_fingerprint, DedupEngine, DedupOutcome};
use crate::pipeline::report::CleaningReport;

/// Drives raw listings through normalization, fingerprinting, dedup and scoring.
///
/// Processing order defines which copy of a listing is "first seen", so batches are
/// cleaned strictly in input order and the pipeline is meant to be driven from one
/// thread per dedup scope. Every input produces exactly one output.
pub struct CleaningPipeline {
    price: PriceNormalizer,
    area: AreaNormalizer,
    text: TextCanonicalizer,
    dedup: DedupEngine,
    scorer: Box<dyn QualityScorer + Send + Sync>,
}

impl std::fmt::Debug for CleaningPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleaningPipeline")
            .field("price", &self.price)
            .field("area", &self.area)
            .field("dedup", &self.dedup)
            .field("scorer", &"<Box<dyn QualityScorer>>")
            .finish()
    }
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self::with_in_memory_dedup(&CleanerConfig::default())
    }
}

impl CleaningPipeline {
    /// Build a pipeline whose dedup scope is the given seen-fingerprint store.
    pub fn new(config: &CleanerConfig, seen: Arc<dyn SeenFingerprints>) -> Self {
        Self {
            price: PriceNormalizer::new(config.range_policy, config.max_price_pkr),
            area: AreaNormalizer::new(config.range_policy, config.max_area_sqft),
            text: TextCanonicalizer,
            dedup: DedupEngine::new(seen),
            scorer: Box::new(CompletenessScorer::default()),
        }
    }

    /// Dedup scope limited to what this pipeline instance processes.
    pub fn with_in_memory_dedup(config: &CleanerConfig) -> Self {
        Self::new(config, Arc::new(InMemorySeenFingerprints::new()))
    }

    /// Use the durable SQLite index when `seen_db_path` is configured, otherwise an
    /// in-memory scope.
    pub fn from_config(config: &CleanerConfig) -> Result<Self> {
        match &config.seen_db_path {
            Some(path) => {
                let store = SqliteSeenFingerprints::open(path)?;
                Ok(Self::new(config, Arc::new(store)))
            }
            None => Ok(Self::with_in_memory_dedup(config)),
        }
    }

    pub fn with_scorer(mut self, scorer: Box<dyn QualityScorer + Send + Sync>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn dedup(&self) -> &DedupEngine {
        &self.dedup
    }

    /// Price, area and text normalization. The three are independent of each other.
    pub fn canonicalize(&self, raw: &RawRecord) -> CanonicalListing {
        let price_pkr = raw.price_raw.as_deref().and_then(|p| self.price.normalize(p));
        let (area_size, area_unit_raw) = match raw.area_raw.as_deref() {
            Some(a) => self.area.normalize(a),
            None => (None, None),
        };
        let property_type = self.text.property_type(raw.property_type.as_deref());

        metrics::normalize::price(price_pkr.is_some());
        metrics::normalize::area(area_size.is_some());
        metrics::normalize::property_type(property_type);

        CanonicalListing {
            title: self.text.title(raw.title.as_deref()),
            city: self.text.city(raw.city.as_deref()),
            area: self.text.area(raw.area.as_deref()),
            property_type: property_type.to_string(),
            price_pkr,
            area_size,
            area_unit_raw,
            bedrooms: raw.bedrooms.as_deref().and_then(parse_count),
            bathrooms: raw.bathrooms.as_deref().and_then(parse_count),
            agent_name: raw.agent_name.as_deref().and_then(clean_agent_name),
            contact_phone: raw.contact_phone.as_deref().and_then(clean_phone),
            date_posted: raw.date_posted.as_deref().and_then(parse_date_posted),
        }
    }

    /// Clean one record. Never fails: unparseable fields come back absent.
    pub fn clean_single(&self, raw: &RawRecord) -> CleanedRecord {
        self.clean_with_outcome(raw).0
    }

    fn clean_with_outcome(&self, raw: &RawRecord) -> (CleanedRecord, DedupOutcome, bool) {
        let canonical = self.canonicalize(raw);
        let content_hash = compute_fingerprint(&canonical);
        let outcome = self.dedup.check(&content_hash);
        let score = self.scorer.score(&canonical);
        let listable = quality_gate::is_listable(&canonical);

        debug!(
            content_hash = %content_hash,
            is_duplicate = outcome.is_duplicate,
            score,
            missing = ?quality_gate::missing_fields(&canonical),
            "Cleaned listing"
        );
        metrics::quality::score_recorded(score);
        metrics::pipeline::record_cleaned(raw.source_website.as_deref());

        let record =
            CleanedRecord::assemble(raw, canonical, content_hash, outcome.is_duplicate, score);
        (record, outcome, listable)
    }

    /// Clean a batch in input order and summarize it.
    ///
    /// Input order is part of the contract: of several records sharing a fingerprint,
    /// the earliest one is the original and the rest are flagged duplicates.
    #[instrument(skip(self, raws), fields(batch_size = raws.len()))]
    pub fn clean_batch(&self, raws: &[RawRecord]) -> (Vec<CleanedRecord>, CleaningReport) {
        let mut cleaned = Vec::with_capacity(raws.len());
        let mut listable_count = 0usize;
        let mut store_errors = 0usize;

        for raw in raws {
            let (record, outcome, listable) = self.clean_with_outcome(raw);
            if listable {
                listable_count += 1;
            }
            if outcome.store_error {
                store_errors += 1;
            }
            cleaned.push(record);
        }

        let report = CleaningReport::build(&cleaned, listable_count, store_errors);
        metrics::pipeline::batch_processed(raws.len());
        info!(
            run_id = %report.run_id,
            processed = report.processed_count,
            duplicates = report.duplicate_count,
            listable = report.listable_count,
            "Cleaned batch"
        );

        (cleaned, report)
    }
}

/// Clean one record with default settings and a fresh dedup scope.
pub fn clean_single(raw: &RawRecord) -> CleanedRecord {
    CleaningPipeline::default().clean_single(raw)
}

/// Clean a batch with default settings; the batch is its own dedup scope.
pub fn clean_batch(raws: &[RawRecord]) -> (Vec<CleanedRecord>, CleaningReport) {
    CleaningPipeline::default().clean_batch(raws)
}
