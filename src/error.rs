//! Strict-layer errors for instance id parsing
//!
//! The core parsers are total functions that degrade to the empty value on
//! malformed input and never fail. The `FromStr` impls layered on top of them
//! report these errors instead, for callers that want `"...".parse()?`
//! semantics rather than sentinel checking.

use thiserror::Error;

/// Errors raised by the strict parsing layer
///
/// Each variant carries the offending input so the caller can log or surface
/// it without re-threading the original string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    /// Input did not survive the miid sanity gate or structural parse,
    /// or its canonical re-serialization differs from the input
    #[error("not a canonical miid: '{input}'")]
    InvalidMiid { input: String },

    /// Input did not parse into a call graph whose canonical
    /// re-serialization reproduces it
    #[error("not a canonical ciid: '{input}'")]
    InvalidCiid { input: String },
}

/// Result type for strict parsing operations
pub type ParseIdResult<T> = std::result::Result<T, ParseIdError>;
