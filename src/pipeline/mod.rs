pub mod orchestrator;
pub mod processing;
pub mod report;

pub use orchestrator::{clean_batch, clean_single, CleaningPipeline};
pub use report::{CleaningReport, QualityStats, ValueStats};
