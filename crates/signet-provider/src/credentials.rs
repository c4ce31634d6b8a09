//! Credential store trait and implementations.
//!
//! This module defines the [`CredentialStore`] trait for resolving consumer
//! and token secrets, along with a [`StaticCredentialStore`] for testing and
//! development use cases.

use std::collections::HashMap;

use crate::error::VerifyError;

/// Trait for looking up the secrets that key OAuth 1.0a signatures.
///
/// Implementations may back this with a database, configuration file, or any
/// other credential store.
pub trait CredentialStore: Send + Sync {
    /// Retrieve the shared secret registered for a consumer key.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::UnknownConsumer`] if the consumer key is not
    /// recognized.
    fn consumer_secret(&self, consumer_key: &str) -> Result<String, VerifyError>;

    /// Retrieve the secret of a token issued to the consumer.
    ///
    /// Two-legged requests carry no token, so this is only consulted when
    /// `oauth_token` is present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::UnknownToken`] if the token is not registered
    /// for this consumer.
    fn token_secret(&self, consumer_key: &str, token: &str) -> Result<String, VerifyError>;
}

/// A simple in-memory credential store backed by `HashMap`s.
///
/// Suitable for testing and development environments. For production use,
/// implement [`CredentialStore`] with a secure credential store.
///
/// # Examples
///
/// ```
/// use signet_provider::{CredentialStore, StaticCredentialStore};
///
/// let store = StaticCredentialStore::new(vec![
///     ("dpf43f3p2l4k3l03".to_owned(), "kd94hf93k423kf44".to_owned()),
/// ])
/// .with_token("dpf43f3p2l4k3l03", "nnch734d00sl2jdk", "pfkkdhi9sl3r4s00");
///
/// let secret = store.consumer_secret("dpf43f3p2l4k3l03").unwrap();
/// assert_eq!(secret, "kd94hf93k423kf44");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    consumers: HashMap<String, String>,
    tokens: HashMap<(String, String), String>,
}

impl StaticCredentialStore {
    /// Create a store from an iterable of (consumer key, consumer secret)
    /// pairs.
    pub fn new(consumers: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            consumers: consumers.into_iter().collect(),
            tokens: HashMap::new(),
        }
    }

    /// Register a token secret for a consumer.
    #[must_use]
    pub fn with_token(
        mut self,
        consumer_key: impl Into<String>,
        token: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        self.tokens
            .insert((consumer_key.into(), token.into()), secret.into());
        self
    }
}

impl CredentialStore for StaticCredentialStore {
    fn consumer_secret(&self, consumer_key: &str) -> Result<String, VerifyError> {
        self.consumers
            .get(consumer_key)
            .cloned()
            .ok_or_else(|| VerifyError::UnknownConsumer(consumer_key.to_owned()))
    }

    fn token_secret(&self, consumer_key: &str, token: &str) -> Result<String, VerifyError> {
        self.tokens
            .get(&(consumer_key.to_owned(), token.to_owned()))
            .cloned()
            .ok_or_else(|| VerifyError::UnknownToken(token.to_owned()))
    }
}
