pub mod ports;

pub use ports::SeenFingerprints;
