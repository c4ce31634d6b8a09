//! End-to-end verification of OAuth 1.0a signed requests.
//!
//! This module implements the full verification flow:
//!
//! 1. Collect the signable query/body parameters and extract the presented
//!    credentials, header first, request parameters as fallback.
//! 2. Check that the parameters required by the declared signature method
//!    are present.
//! 3. Resolve the consumer secret, validate timestamp freshness and nonce
//!    uniqueness, then resolve the token secret.
//! 4. Rebuild the signature base string and compare the presented signature
//!    to the computed one using constant-time comparison.
//!
//! The main entry point is [`OAuthProvider::verify`].

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::request::Parts;
use signet_oauth1::{
    BaseStringBuilder, OAuthParameter, ParameterExtractor, ParameterSet, SchemeMatch,
    collect_request_parameters,
};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::credentials::CredentialStore;
use crate::error::VerifyError;
use crate::nonce::{InMemoryNonceService, NonceService};
use crate::signature::{SignatureMethod, SignatureVerifier, StandardVerifier};

/// The result of a successful verification.
#[derive(Debug, Clone)]
pub struct VerifiedCredentials {
    /// The consumer key that signed the request.
    pub consumer_key: String,
    /// The token presented with the request, if any.
    pub token: Option<String>,
    /// The signature method the consumer used.
    pub signature_method: String,
    /// The protection-space realm from the `Authorization` header, if any.
    pub realm: Option<String>,
}

/// Verifies OAuth 1.0a signed requests against registered credentials.
///
/// The provider wires the extractor and base string builder to a credential
/// store, a nonce service, and a signature verifier. The built-in
/// collaborators cover the common case; both can be replaced for shared
/// replay state or additional signature methods.
pub struct OAuthProvider {
    extractor: ParameterExtractor,
    builder: BaseStringBuilder,
    credentials: Arc<dyn CredentialStore>,
    nonces: Arc<dyn NonceService>,
    verifier: Arc<dyn SignatureVerifier>,
}

impl fmt::Debug for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthProvider")
            .field("extractor", &self.extractor)
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl OAuthProvider {
    /// Create a provider with the built-in nonce service and signature
    /// verifier.
    #[must_use]
    pub fn new(config: &ProviderConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        let scheme_match = if config.strict_scheme_match {
            SchemeMatch::Exact
        } else {
            SchemeMatch::CaseInsensitive
        };
        let mut extractor = ParameterExtractor::new().with_scheme_match(scheme_match);
        if !config.allow_request_parameters {
            extractor = extractor.header_only();
        }
        let mut builder = BaseStringBuilder::new();
        if let Some(base_url) = &config.base_url {
            builder = builder.with_base_url(base_url.clone());
        }

        Self {
            extractor,
            builder,
            credentials,
            nonces: Arc::new(InMemoryNonceService::new(config.nonce_window_secs)),
            verifier: Arc::new(StandardVerifier),
        }
    }

    /// Replace the replay-protection collaborator.
    #[must_use]
    pub fn with_nonce_service(mut self, nonces: Arc<dyn NonceService>) -> Self {
        self.nonces = nonces;
        self
    }

    /// Replace the signature-verification collaborator.
    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn SignatureVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// Verify an OAuth 1.0a signed request.
    ///
    /// `body` is only consulted when the request is form-encoded; pass an
    /// empty `Bytes` for bodyless requests.
    ///
    /// # Errors
    ///
    /// Returns a [`VerifyError`] if:
    /// - No credentials are presented, or they are malformed
    /// - A parameter required by the declared method is missing
    /// - The consumer key or token is not registered
    /// - The timestamp or nonce fails the replay check
    /// - The signature does not match
    pub fn verify(&self, parts: &Parts, body: &Bytes) -> Result<VerifiedCredentials, VerifyError> {
        // Collect the signable parameters and extract the credentials.
        let request_params = collect_request_parameters(parts, body);
        let credentials = self
            .extractor
            .extract(parts, &request_params)?
            .ok_or(VerifyError::MissingCredentials)?;

        let consumer_key = required(&credentials, OAuthParameter::ConsumerKey)?;
        let method_name = required(&credentials, OAuthParameter::SignatureMethod)?;
        let provided_signature = required(&credentials, OAuthParameter::Signature)?;

        debug!(consumer_key, signature_method = method_name, "Verifying OAuth 1.0a request");

        // Timestamp and nonce are mandatory except under PLAINTEXT, which
        // leaves replay concerns to the secure channel it already requires.
        let timestamp = credentials.timestamp();
        let nonce = credentials.nonce();
        if method_name != SignatureMethod::Plaintext.as_str() {
            if timestamp.is_none() {
                return Err(VerifyError::MissingParameter(OAuthParameter::Timestamp.as_str()));
            }
            if nonce.is_none() {
                return Err(VerifyError::MissingParameter(OAuthParameter::Nonce.as_str()));
            }
        }
        let timestamp = timestamp.map(parse_timestamp).transpose()?;

        // Resolve the consumer before touching the nonce store so unknown
        // consumers cannot grow it.
        let consumer_secret = self.credentials.consumer_secret(consumer_key)?;

        if let (Some(timestamp), Some(nonce)) = (timestamp, nonce) {
            self.nonces.validate(consumer_key, timestamp, nonce)?;
        }

        // Some consumers send an empty oauth_token on two-legged requests;
        // treat it as absent.
        let token = credentials.token().filter(|token| !token.is_empty());
        let token_secret = match token {
            Some(token) => self.credentials.token_secret(consumer_key, token)?,
            None => String::new(),
        };

        // Rebuild the base string the consumer signed and compare.
        let base_string = self.builder.build(
            parts.method.as_str(),
            &parts.uri,
            &credentials,
            &request_params,
        )?;

        let matched = self.verifier.verify(
            method_name,
            &base_string,
            &consumer_secret,
            &token_secret,
            provided_signature,
        )?;

        if matched {
            debug!(consumer_key, "Signature verification succeeded");
            Ok(VerifiedCredentials {
                consumer_key: consumer_key.to_owned(),
                token: token.map(ToOwned::to_owned),
                signature_method: method_name.to_owned(),
                realm: credentials.realm().map(ToOwned::to_owned),
            })
        } else {
            debug!(consumer_key, provided = provided_signature, "Signature mismatch");
            Err(VerifyError::SignatureDoesNotMatch)
        }
    }
}

fn required(credentials: &ParameterSet, parameter: OAuthParameter) -> Result<&str, VerifyError> {
    credentials
        .get(parameter.as_str())
        .ok_or(VerifyError::MissingParameter(parameter.as_str()))
}

fn parse_timestamp(raw: &str) -> Result<i64, VerifyError> {
    match raw.parse::<i64>() {
        Ok(timestamp) if timestamp > 0 => Ok(timestamp),
        _ => Err(VerifyError::InvalidTimestamp(raw.to_owned())),
    }
}
