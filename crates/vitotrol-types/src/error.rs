//! Error types for identifier parsing in vitotrol-types.

use thiserror::Error;

/// Errors that can occur when parsing Vitotrol identifiers.
///
/// This error type is transport-agnostic and does not include
/// SOAP or HTTP errors (those belong in vitotrol-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The input was empty.
    #[error("Empty {kind}")]
    Empty {
        /// What was being parsed (e.g. "attribute id").
        kind: &'static str,
    },

    /// The input was not a valid numeric identifier.
    #[error("Invalid {kind}: '{input}'")]
    InvalidId {
        /// What was being parsed.
        kind: &'static str,
        /// The rejected input.
        input: String,
    },
}

/// Result type alias using vitotrol-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
