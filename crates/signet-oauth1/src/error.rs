//! Error types for OAuth 1.0a request parsing.
//!
//! Parsing failures are represented by [`ProtocolError`]. The absence of
//! credentials is not an error at this layer; extraction reports it as
//! `Ok(None)` so callers can decide whether anonymous access is acceptable.

/// Errors that can occur while parsing an OAuth 1.0a request.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The `Authorization` header claimed the OAuth scheme but could not be
    /// parsed into `name="value"` pairs.
    #[error("Malformed Authorization header: {0}")]
    MalformedHeader(String),

    /// The request URL is missing a component required for signature base
    /// string normalization.
    #[error("Invalid request URL: {0}")]
    InvalidRequestUrl(String),
}
