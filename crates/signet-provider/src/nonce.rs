//! Replay protection through timestamp windows and nonce tracking.
//!
//! Each signed request carries an `oauth_timestamp` and `oauth_nonce`. A
//! request is fresh when its timestamp falls inside the validity window and
//! its (consumer key, nonce) pair has not been seen inside that window.

use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use crate::error::VerifyError;

/// Trait for validating and recording request nonces.
///
/// Implementations must be safe for concurrent use; verification runs on
/// whatever thread the request arrives on.
pub trait NonceService: Send + Sync {
    /// Validate the timestamp and record the nonce for a request.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::TimestampOutOfWindow`] when the timestamp is
    /// too far from the server clock, or [`VerifyError::NonceAlreadyUsed`]
    /// when the (consumer key, nonce) pair was already presented inside the
    /// window.
    fn validate(&self, consumer_key: &str, timestamp: i64, nonce: &str) -> Result<(), VerifyError>;
}

/// In-memory replay protection with a sliding validity window.
///
/// Timestamps more than the window away from the server clock, in either
/// direction, are rejected. Seen nonces are kept until their timestamp ages
/// out of the window, which bounds memory without a background task. State
/// is process-local; deployments with several verifier instances need a
/// shared [`NonceService`] instead.
#[derive(Debug)]
pub struct InMemoryNonceService {
    window_secs: i64,
    seen: DashMap<(String, String), i64>,
}

impl InMemoryNonceService {
    /// The default validity window: 12 hours, generous enough for skewed
    /// consumer clocks.
    pub const DEFAULT_WINDOW_SECS: i64 = 60 * 60 * 12;

    /// Create a service accepting timestamps within `window_secs` of the
    /// server clock.
    #[must_use]
    pub fn new(window_secs: i64) -> Self {
        Self {
            window_secs,
            seen: DashMap::new(),
        }
    }
}

impl Default for InMemoryNonceService {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW_SECS)
    }
}

impl NonceService for InMemoryNonceService {
    fn validate(&self, consumer_key: &str, timestamp: i64, nonce: &str) -> Result<(), VerifyError> {
        let now = Utc::now().timestamp();
        if (now - timestamp).abs() > self.window_secs {
            debug!(consumer_key, timestamp, now, "Timestamp outside the validity window");
            return Err(VerifyError::TimestampOutOfWindow(timestamp));
        }

        // Entries older than the window can no longer collide with a valid
        // request; drop them before recording the new one.
        self.seen.retain(|_, seen_at| now - *seen_at <= self.window_secs);

        match self.seen.entry((consumer_key.to_owned(), nonce.to_owned())) {
            dashmap::Entry::Occupied(_) => {
                debug!(consumer_key, nonce, "Nonce replayed inside the validity window");
                Err(VerifyError::NonceAlreadyUsed)
            }
            dashmap::Entry::Vacant(entry) => {
                entry.insert(timestamp);
                Ok(())
            }
        }
    }
}
