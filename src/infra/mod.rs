pub mod seen_memory;
pub mod seen_sqlite;

pub use seen_memory::InMemorySeenFingerprints;
pub use seen_sqlite::SqliteSeenFingerprints;
