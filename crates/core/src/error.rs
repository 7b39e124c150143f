//! Error types for the PromptDeck domain.
//!
//! Sequence and gesture operations are total, so nothing here is raised by
//! a mutation. Errors only appear at the boundaries: parsing input events,
//! decoding block kinds and building settings.

use thiserror::Error;

/// The top-level error type for PromptDeck operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown block kind: {0} (expected user, assistant or system)")]
    UnknownKind(String),

    #[error("Invalid input event: {0}")]
    InvalidEvent(String),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_names_the_value() {
        let err = Error::UnknownKind("tool".into());
        assert!(err.to_string().contains("tool"));
        assert!(err.to_string().contains("assistant"));
    }

    #[test]
    fn serde_errors_convert() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("nope");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
