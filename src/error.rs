//! Error taxonomy
//!
//! Detection itself is total: a query with no close example is `None`, not an
//! error. Failures only come from inserting malformed examples, rejected
//! configuration, or the optional file loaders.

/// Errors surfaced by the intent engine
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("invalid example: {reason}")]
    InvalidExample { reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, IntentError>;
