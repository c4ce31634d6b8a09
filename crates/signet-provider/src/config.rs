//! Configuration for the verification flow.
//!
//! All settings can be driven by `SIGNET_*` environment variables, with
//! defaults that suit a service reachable at the URL consumers signed.

use crate::nonce::InMemoryNonceService;

/// Configuration for an [`crate::OAuthProvider`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Pinned scheme/host/port for the signed URL, for deployments behind
    /// proxies that rewrite the request target. `None` derives the URL from
    /// the request itself.
    pub base_url: Option<String>,
    /// Require the canonical `OAuth` scheme spelling instead of the
    /// case-insensitive RFC 2617 match.
    pub strict_scheme_match: bool,
    /// Accept credentials delivered as query/body parameters when the
    /// `Authorization` header carries none.
    pub allow_request_parameters: bool,
    /// Validity window, in seconds, applied to `oauth_timestamp` by the
    /// built-in nonce service.
    pub nonce_window_secs: i64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            strict_scheme_match: false,
            allow_request_parameters: true,
            nonce_window_secs: InMemoryNonceService::DEFAULT_WINDOW_SECS,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("SIGNET_BASE_URL") {
            config.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("SIGNET_STRICT_SCHEME") {
            config.strict_scheme_match = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Ok(v) = std::env::var("SIGNET_ALLOW_REQUEST_PARAMETERS") {
            config.allow_request_parameters = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Ok(v) = std::env::var("SIGNET_NONCE_WINDOW_SECS") {
            if let Ok(secs) = v.parse() {
                config.nonce_window_secs = secs;
            }
        }

        config
    }
}
