use std::sync::Arc;
use tracing::{debug, warn};

use crate::app::ports::SeenFingerprints;
use crate::infra::InMemorySeenFingerprints;
use crate::observability::metrics;

/// Outcome of looking a fingerprint up in the seen set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupOutcome {
    pub is_duplicate: bool,
    /// The store failed; the record was let through as not-duplicate
    pub store_error: bool,
}

/// Flags, never drops, records whose fingerprint was already seen in scope.
#[derive(Clone)]
pub struct DedupEngine {
    seen: Arc<dyn SeenFingerprints>,
}

impl std::fmt::Debug for DedupEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupEngine")
            .field("seen", &"<Arc<dyn SeenFingerprints>>")
            .finish()
    }
}

impl Default for DedupEngine {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl DedupEngine {
    pub fn new(seen: Arc<dyn SeenFingerprints>) -> Self {
        Self { seen }
    }

    /// Scope limited to whatever this engine processes.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemorySeenFingerprints::new()))
    }

    pub fn seen(&self) -> &Arc<dyn SeenFingerprints> {
        &self.seen
    }

    pub fn check(&self, fingerprint: &str) -> DedupOutcome {
        match self.seen.check_and_insert(fingerprint) {
            Ok(true) => DedupOutcome {
                is_duplicate: false,
                store_error: false,
            },
            Ok(false) => {
                debug!(content_hash = %fingerprint, "Duplicate listing");
                metrics::dedup::duplicate_flagged();
                DedupOutcome {
                    is_duplicate: true,
                    store_error: false,
                }
            }
            Err(e) => {
                warn!(
                    content_hash = %fingerprint,
                    error = %e,
                    "Seen-fingerprint lookup failed; treating as new"
                );
                metrics::dedup::store_error();
                DedupOutcome {
                    is_duplicate: false,
                    store_error: true,
                }
            }
        }
    }
}
