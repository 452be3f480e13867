use std::collections::HashSet;
use std::sync::Mutex;

use crate::app::ports::SeenFingerprints;
use crate::error::{CleanerError, Result};

/// Process-local seen set. Suitable for single-batch scope, tests, or several workers
/// sharing one `Arc` (the mutex makes check-then-insert a single step).
#[derive(Debug, Default)]
pub struct InMemorySeenFingerprints {
    seen: Mutex<HashSet<String>>,
}

impl InMemorySeenFingerprints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from fingerprints persisted by an earlier run.
    pub fn with_seen<I, S>(fingerprints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seen: Mutex::new(fingerprints.into_iter().map(Into::into).collect()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashSet<String>>> {
        self.seen.lock().map_err(|e| CleanerError::StoreUnavailable {
            message: format!("seen set lock poisoned: {}", e),
        })
    }
}

impl SeenFingerprints for InMemorySeenFingerprints {
    fn check_and_insert(&self, fingerprint: &str) -> Result<bool> {
        Ok(self.lock()?.insert(fingerprint.to_string()))
    }

    fn contains(&self, fingerprint: &str) -> Result<bool> {
        Ok(self.lock()?.contains(fingerprint))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }
}
