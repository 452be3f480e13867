use crate::error::Result;

/// The set of fingerprints already seen in the current dedup scope: one batch, or a
/// durable index owned by the persistence layer for cross-run dedup.
///
/// `check_and_insert` must be atomic: two callers racing on the same new fingerprint
/// must not both be told they were first.
pub trait SeenFingerprints: Send + Sync {
    /// Record `fingerprint`. Returns `true` when it had not been seen before.
    fn check_and_insert(&self, fingerprint: &str) -> Result<bool>;

    fn contains(&self, fingerprint: &str) -> Result<bool>;

    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
