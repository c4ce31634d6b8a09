//! Error types for OAuth 1.0a verification.
//!
//! All verification failures are represented by [`VerifyError`], with a
//! specific variant for each failure mode so callers can map them to
//! distinct HTTP responses (401 for bad credentials, 400 for malformed
//! requests).

use signet_oauth1::ProtocolError;

/// Errors that can occur while verifying an OAuth 1.0a signed request.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The request presented no OAuth credentials at all.
    #[error("No OAuth credentials presented")]
    MissingCredentials,

    /// The request carried credentials that could not be parsed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A protocol parameter required for verification is absent.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// The consumer key is not registered.
    #[error("Unknown consumer key: {0}")]
    UnknownConsumer(String),

    /// The token is not registered for the consumer.
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    /// The `oauth_signature_method` is not one the verifier implements.
    #[error("Unsupported signature method: {0}")]
    UnsupportedSignatureMethod(String),

    /// `oauth_timestamp` is not a positive decimal integer.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// `oauth_timestamp` lies outside the accepted window.
    #[error("Timestamp {0} is outside the accepted window")]
    TimestampOutOfWindow(i64),

    /// The (consumer key, nonce) pair was already used inside the window.
    #[error("Nonce already used")]
    NonceAlreadyUsed,

    /// The presented signature does not match the computed one.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}
