use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Seen-fingerprint store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Seen-fingerprint store unavailable: {message}")]
    StoreUnavailable { message: String },
}

pub type Result<T> = std::result::Result<T, CleanerError>;
