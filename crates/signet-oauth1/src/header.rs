//! `Authorization` header parsing and credential extraction.
//!
//! Extraction recovers the OAuth parameters a request presented. The
//! `Authorization` header is the primary channel; when it is absent or
//! carries a different scheme, `oauth_`-prefixed query/body parameters are
//! accepted as a fallback unless the extractor is restricted to headers.
//!
//! A request may legally carry several `Authorization` header lines. They are
//! concatenated with commas into one logical value before parsing, matching
//! how HTTP defines multi-valued headers, so credentials split across lines
//! still extract.

use http::request::Parts;
use tracing::debug;

use crate::encode::percent_decode;
use crate::error::ProtocolError;
use crate::params::{OAuthParameter, ParameterSet};

/// The auth-scheme token that marks an OAuth 1.0a header.
const SCHEME: &str = "OAuth";

/// How the `OAuth` auth-scheme token is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemeMatch {
    /// RFC 2617 matching: auth-scheme tokens compare case-insensitively.
    #[default]
    CaseInsensitive,
    /// Accept only the canonical `OAuth` spelling.
    Exact,
}

/// Extracts the OAuth credential parameters from an incoming request.
///
/// The default extractor matches the scheme case-insensitively and falls back
/// to query/body parameters when the header carries no OAuth credentials.
#[derive(Debug, Clone)]
pub struct ParameterExtractor {
    scheme_match: SchemeMatch,
    allow_request_parameters: bool,
}

impl Default for ParameterExtractor {
    fn default() -> Self {
        Self {
            scheme_match: SchemeMatch::default(),
            allow_request_parameters: true,
        }
    }
}

impl ParameterExtractor {
    /// Create an extractor with the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how the `OAuth` scheme token is matched.
    #[must_use]
    pub fn with_scheme_match(mut self, scheme_match: SchemeMatch) -> Self {
        self.scheme_match = scheme_match;
        self
    }

    /// Restrict extraction to the `Authorization` header, disabling the
    /// query/body parameter fallback.
    #[must_use]
    pub fn header_only(mut self) -> Self {
        self.allow_request_parameters = false;
        self
    }

    /// Extract the presented credentials from a request.
    ///
    /// `request_params` are the decoded query/body pairs collected by
    /// [`crate::request::collect_request_parameters`]; they are only
    /// consulted when the header yields nothing and the fallback is enabled.
    ///
    /// Returns `Ok(None)` when the request presents no OAuth credentials at
    /// all. A header that matches the scheme but cannot be parsed is an
    /// error, never a silent `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedHeader`] when an OAuth-scheme
    /// `Authorization` value is not visible ASCII, a parameter has no `=`,
    /// or a quoted value is never closed.
    pub fn extract(
        &self,
        parts: &Parts,
        request_params: &[(String, String)],
    ) -> Result<Option<ParameterSet>, ProtocolError> {
        let mut fragments = Vec::new();
        for value in parts.headers.get_all(http::header::AUTHORIZATION) {
            match value.to_str() {
                Ok(text) => fragments.push(text),
                // Other schemes may legally carry obs-text bytes (a `Basic`
                // header with Latin-1 credentials, say); those fall through
                // to the request-parameter fallback like any foreign scheme.
                Err(_) if self.bytes_match_scheme(value.as_bytes()) => {
                    return Err(ProtocolError::MalformedHeader(
                        "header value is not visible ASCII".to_owned(),
                    ));
                }
                Err(_) => {
                    debug!("Skipping non-ASCII Authorization value of a different scheme");
                }
            }
        }

        if !fragments.is_empty() {
            let logical = fragments.join(",");
            if let Some(set) = self.parse_header_value(&logical)? {
                return Ok(Some(set));
            }
            debug!("Authorization header carries a different auth scheme");
        }

        if self.allow_request_parameters {
            return Ok(from_request_parameters(request_params));
        }

        Ok(None)
    }

    /// Parse one logical `Authorization` value.
    ///
    /// Returns `Ok(None)` when the value does not carry the OAuth scheme.
    /// When it does, every `name="value"` pair with a protocol name
    /// (`oauth_*` or `realm`) is percent-decoded into the returned set;
    /// other pairs are ignored. Values may be quoted or bare, and commas
    /// inside quotes belong to the value.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedHeader`] when a pair has no `=` or
    /// a quoted value is never closed.
    pub fn parse_header_value(&self, value: &str) -> Result<Option<ParameterSet>, ProtocolError> {
        let Some(rest) = self.strip_scheme(value) else {
            return Ok(None);
        };

        let mut set = ParameterSet::new();
        for (name, raw) in split_pairs(rest)? {
            if is_protocol_name(&name) {
                set.insert(name, percent_decode(&raw));
            } else {
                debug!(parameter = %name, "Ignoring non-protocol Authorization parameter");
            }
        }
        Ok(Some(set))
    }

    /// Strip the scheme token, returning the parameter remainder when the
    /// value is an OAuth header under the configured matching rule.
    fn strip_scheme<'a>(&self, value: &'a str) -> Option<&'a str> {
        let value = value.trim_start();
        let token = value.get(..SCHEME.len())?;
        let matched = match self.scheme_match {
            SchemeMatch::CaseInsensitive => token.eq_ignore_ascii_case(SCHEME),
            SchemeMatch::Exact => token == SCHEME,
        };
        if !matched {
            return None;
        }
        // The token must end at a word boundary; `OAuth2 ...` is a
        // different scheme, not ours.
        let rest = &value[SCHEME.len()..];
        if !rest.is_empty() && !rest.starts_with(|c: char| c.is_whitespace()) {
            return None;
        }
        Some(rest)
    }

    /// Whether a raw header value begins with the OAuth scheme token under
    /// the configured matching rule.
    fn bytes_match_scheme(&self, value: &[u8]) -> bool {
        let start = value
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(value.len());
        let value = &value[start..];
        let Some(token) = value.get(..SCHEME.len()) else {
            return false;
        };
        let matched = match self.scheme_match {
            SchemeMatch::CaseInsensitive => token.eq_ignore_ascii_case(SCHEME.as_bytes()),
            SchemeMatch::Exact => token == SCHEME.as_bytes(),
        };
        matched
            && value
                .get(SCHEME.len())
                .is_none_or(u8::is_ascii_whitespace)
    }
}

fn is_protocol_name(name: &str) -> bool {
    name == OAuthParameter::Realm.as_str() || name.starts_with("oauth_")
}

fn from_request_parameters(request_params: &[(String, String)]) -> Option<ParameterSet> {
    let mut set = ParameterSet::new();
    for (name, value) in request_params {
        if name.starts_with("oauth_") {
            set.insert(name.clone(), value.clone());
        }
    }
    if set.is_empty() { None } else { Some(set) }
}

/// Split the post-scheme remainder of an `Authorization` value into
/// `(name, raw value)` pairs.
///
/// Implemented as a single forward scan rather than a split on commas so
/// that commas inside quoted values survive and adversarial input costs
/// linear time. Whitespace around names, `=`, and separators is
/// insignificant, which also absorbs values folded across header lines.
fn split_pairs(input: &str) -> Result<Vec<(String, String)>, ProtocolError> {
    let mut pairs = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        // Skip pair separators and surrounding whitespace.
        match input[pos..].find(|c: char| !c.is_whitespace() && c != ',') {
            Some(offset) => pos += offset,
            None => break,
        }

        // The name runs to `=`; hitting a `,` first means the pair had none.
        let Some(eq) = input[pos..].find('=') else {
            return Err(ProtocolError::MalformedHeader(format!(
                "parameter `{}` has no value",
                input[pos..].trim()
            )));
        };
        let name_end = pos + eq;
        if let Some(stray) = input[pos..name_end].find(',') {
            return Err(ProtocolError::MalformedHeader(format!(
                "parameter `{}` has no value",
                input[pos..pos + stray].trim()
            )));
        }
        let name = input[pos..name_end].trim();
        if name.is_empty() {
            return Err(ProtocolError::MalformedHeader(
                "parameter with an empty name".to_owned(),
            ));
        }
        pos = name_end + 1;

        match input[pos..].find(|c: char| !c.is_whitespace()) {
            Some(offset) => pos += offset,
            None => {
                pairs.push((name.to_owned(), String::new()));
                break;
            }
        }

        if input[pos..].starts_with('"') {
            pos += 1;
            let Some(close) = input[pos..].find('"') else {
                return Err(ProtocolError::MalformedHeader(format!(
                    "unterminated quote in value of `{name}`"
                )));
            };
            pairs.push((name.to_owned(), input[pos..pos + close].to_owned()));
            pos += close + 1;
        } else {
            let end = input[pos..].find(',').map_or(input.len(), |comma| pos + comma);
            pairs.push((name.to_owned(), input[pos..end].trim_end().to_owned()));
            pos = end;
        }
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_header(value: &str) -> Parts {
        let (parts, _) = http::Request::builder()
            .method("GET")
            .uri("https://photos.example.net/photos")
            .header(http::header::AUTHORIZATION, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    fn request_without_header(uri: &str) -> Parts {
        let (parts, _) = http::Request::builder()
            .method("GET")
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_should_parse_folded_authorization_header() {
        let header = "OAuth realm=\"http://sp.example.com/\",\n\
                oauth_consumer_key=\"0685bd9184jfhq22\",\n\
                oauth_token=\"ad180jjd733klru7\",\n\
                oauth_signature_method=\"HMAC-SHA1\",\n\
                oauth_signature=\"wOJIO9A2W5mFwDgiDvZbTSMK%2FPY%3D\",\n\
                oauth_timestamp=\"137131200\",\n\
                oauth_nonce=\"4572616e48616d6d65724c61686176\",\n\
                oauth_version=\"1.0\"";

        let set = ParameterExtractor::new()
            .parse_header_value(header)
            .unwrap()
            .expect("scheme should match");

        assert_eq!(set.realm(), Some("http://sp.example.com/"));
        assert_eq!(set.consumer_key(), Some("0685bd9184jfhq22"));
        assert_eq!(set.token(), Some("ad180jjd733klru7"));
        assert_eq!(set.signature_method(), Some("HMAC-SHA1"));
        assert_eq!(set.signature(), Some("wOJIO9A2W5mFwDgiDvZbTSMK/PY="));
        assert_eq!(set.timestamp(), Some("137131200"));
        assert_eq!(set.nonce(), Some("4572616e48616d6d65724c61686176"));
        assert_eq!(set.version(), Some("1.0"));
    }

    #[test]
    fn test_should_extract_from_request() {
        let parts = request_with_header(
            "OAuth oauth_consumer_key=\"dpf43f3p2l4k3l03\", oauth_signature_method=\"PLAINTEXT\"",
        );
        let set = ParameterExtractor::new()
            .extract(&parts, &[])
            .unwrap()
            .expect("credentials presented");
        assert_eq!(set.consumer_key(), Some("dpf43f3p2l4k3l03"));
        assert_eq!(set.signature_method(), Some("PLAINTEXT"));
    }

    #[test]
    fn test_should_merge_multiple_header_fragments() {
        let (parts, _) = http::Request::builder()
            .uri("https://photos.example.net/photos")
            .header(http::header::AUTHORIZATION, "OAuth realm=\"http://sp.example.com/\"")
            .header(http::header::AUTHORIZATION, "oauth_consumer_key=\"0685bd9184jfhq22\"")
            .body(())
            .unwrap()
            .into_parts();

        let set = ParameterExtractor::new()
            .extract(&parts, &[])
            .unwrap()
            .expect("credentials presented");
        assert_eq!(set.realm(), Some("http://sp.example.com/"));
        assert_eq!(set.consumer_key(), Some("0685bd9184jfhq22"));
    }

    #[test]
    fn test_should_report_no_credentials_when_header_absent() {
        let parts = request_without_header("https://photos.example.net/photos");
        let result = ParameterExtractor::new().extract(&parts, &[]).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_should_fall_back_to_request_parameters() {
        let parts = request_without_header("https://photos.example.net/photos");
        let params = vec![
            ("oauth_consumer_key".to_owned(), "dpf43f3p2l4k3l03".to_owned()),
            ("oauth_signature".to_owned(), "sig value".to_owned()),
            ("file".to_owned(), "vacation.jpg".to_owned()),
        ];
        let set = ParameterExtractor::new()
            .extract(&parts, &params)
            .unwrap()
            .expect("credentials presented");
        assert_eq!(set.consumer_key(), Some("dpf43f3p2l4k3l03"));
        assert_eq!(set.signature(), Some("sig value"));
        assert!(!set.contains("file"));
    }

    #[test]
    fn test_should_prefer_header_over_request_parameters() {
        let parts = request_with_header("OAuth oauth_consumer_key=\"from-header\"");
        let params = vec![("oauth_consumer_key".to_owned(), "from-query".to_owned())];
        let set = ParameterExtractor::new()
            .extract(&parts, &params)
            .unwrap()
            .expect("credentials presented");
        assert_eq!(set.consumer_key(), Some("from-header"));
    }

    #[test]
    fn test_should_skip_fallback_when_header_only() {
        let parts = request_without_header("https://photos.example.net/photos");
        let params = vec![("oauth_consumer_key".to_owned(), "dpf43f3p2l4k3l03".to_owned())];
        let result = ParameterExtractor::new()
            .header_only()
            .extract(&parts, &params)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_should_ignore_other_auth_schemes() {
        let parts = request_with_header("Basic dXNlcjpwYXNzd29yZA==");
        let result = ParameterExtractor::new().extract(&parts, &[]).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_should_not_match_oauth2_style_schemes() {
        let result = ParameterExtractor::new()
            .parse_header_value("OAuth2 token=\"abc\"")
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_should_match_scheme_case_insensitively_by_default() {
        let set = ParameterExtractor::new()
            .parse_header_value("oauth oauth_token=\"t\"")
            .unwrap();
        assert!(set.is_some());

        let set = ParameterExtractor::new()
            .parse_header_value("OAUTH oauth_token=\"t\"")
            .unwrap();
        assert!(set.is_some());
    }

    #[test]
    fn test_should_require_exact_scheme_when_configured() {
        let strict = ParameterExtractor::new().with_scheme_match(SchemeMatch::Exact);
        assert!(strict.parse_header_value("OAUTH oauth_token=\"t\"").unwrap().is_none());
        assert!(strict.parse_header_value("OAuth oauth_token=\"t\"").unwrap().is_some());
    }

    #[test]
    fn test_should_treat_bare_scheme_as_empty_credentials() {
        let set = ParameterExtractor::new()
            .parse_header_value("OAuth")
            .unwrap()
            .expect("scheme should match");
        assert!(set.is_empty());
    }

    #[test]
    fn test_should_accept_unquoted_values() {
        let set = ParameterExtractor::new()
            .parse_header_value("OAuth oauth_version=1.0, oauth_token=\"t\"")
            .unwrap()
            .expect("scheme should match");
        assert_eq!(set.version(), Some("1.0"));
        assert_eq!(set.token(), Some("t"));
    }

    #[test]
    fn test_should_keep_commas_inside_quoted_values() {
        let set = ParameterExtractor::new()
            .parse_header_value("OAuth realm=\"a,b\", oauth_token=\"t\"")
            .unwrap()
            .expect("scheme should match");
        assert_eq!(set.realm(), Some("a,b"));
        assert_eq!(set.token(), Some("t"));
    }

    #[test]
    fn test_should_ignore_non_protocol_parameters() {
        let set = ParameterExtractor::new()
            .parse_header_value("OAuth realm=\"r\", foo=\"bar\", oauth_token=\"t\"")
            .unwrap()
            .expect("scheme should match");
        assert_eq!(set.len(), 2);
        assert!(!set.contains("foo"));
    }

    #[test]
    fn test_should_reject_unterminated_quote() {
        let result = ParameterExtractor::new()
            .parse_header_value("OAuth oauth_token=\"never closed");
        assert!(matches!(result, Err(ProtocolError::MalformedHeader(_))));
    }

    #[test]
    fn test_should_reject_parameter_without_value() {
        let result = ParameterExtractor::new()
            .parse_header_value("OAuth oauth_token, oauth_version=\"1.0\"");
        assert!(matches!(result, Err(ProtocolError::MalformedHeader(_))));
    }

    #[test]
    fn test_should_surface_malformed_header_from_extract() {
        let parts = request_with_header("OAuth oauth_token=\"never closed");
        let result = ParameterExtractor::new().extract(&parts, &[]);
        assert!(matches!(result, Err(ProtocolError::MalformedHeader(_))));
    }

    #[test]
    fn test_should_reject_header_with_invisible_bytes() {
        let (mut parts, _) = http::Request::builder()
            .uri("https://photos.example.net/photos")
            .body(())
            .unwrap()
            .into_parts();
        parts.headers.insert(
            http::header::AUTHORIZATION,
            http::HeaderValue::from_bytes(b"OAuth oauth_token=\"\xFF\"").unwrap(),
        );
        let result = ParameterExtractor::new().extract(&parts, &[]);
        assert!(matches!(result, Err(ProtocolError::MalformedHeader(_))));
    }

    #[test]
    fn test_should_fall_through_foreign_scheme_with_invisible_bytes() {
        let (mut parts, _) = http::Request::builder()
            .uri("https://photos.example.net/photos")
            .body(())
            .unwrap()
            .into_parts();
        parts.headers.insert(
            http::header::AUTHORIZATION,
            http::HeaderValue::from_bytes(b"Basic dXNlcjpw\xE4c3M=").unwrap(),
        );

        let params = vec![("oauth_consumer_key".to_owned(), "dpf43f3p2l4k3l03".to_owned())];
        let set = ParameterExtractor::new()
            .extract(&parts, &params)
            .unwrap()
            .expect("fallback credentials presented");
        assert_eq!(set.consumer_key(), Some("dpf43f3p2l4k3l03"));

        let result = ParameterExtractor::new().extract(&parts, &[]).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_should_decode_empty_values() {
        let set = ParameterExtractor::new()
            .parse_header_value("OAuth oauth_token=\"\", oauth_version=\"1.0\"")
            .unwrap()
            .expect("scheme should match");
        assert_eq!(set.token(), Some(""));
    }
}
