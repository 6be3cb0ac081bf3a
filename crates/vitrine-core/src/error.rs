//! Error types for the formatting engine.

use thiserror::Error;

/// Comprehensive error type for all formatting operations.
///
/// The taxonomy is deliberately small: configuration problems are fatal at
/// engine build time and never occur during per-record formatting, fetch
/// failures are the one category allowed to surface to top-level callers,
/// and everything else (pattern mismatches, permission denials, cycles)
/// degrades locally to placeholders or empty fragments.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Malformed definition detected while building the engine
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// A record or related collection could not be retrieved
    #[error("Fetch failed for {what}: {message}")]
    Fetch { what: String, message: String },
    /// Serialization/deserialization errors in definition or dataset JSON
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl FormatError {
    /// Creates a configuration error with a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a fetch error naming the record or collection that failed.
    pub fn fetch(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            what: what.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for formatting operations
pub type Result<T> = std::result::Result<T, FormatError>;
