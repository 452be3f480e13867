pub mod dedup;
pub mod fingerprint;
pub mod normalize;
pub mod quality_gate;

pub use dedup::{DedupEngine, DedupOutcome};
pub use fingerprint::compute_fingerprint;
pub use quality_gate::{CompletenessScorer, QualityScorer};
