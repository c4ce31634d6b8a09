//! Query string and form body parameter collection.
//!
//! RFC 5849 signs three parameter sources: the `Authorization` header, the
//! query string, and the body when the request is form-encoded. This module
//! covers the latter two, producing decoded pairs in arrival order for the
//! extractor fallback and the base string builder.

use bytes::Bytes;
use http::request::Parts;

/// Collect the decoded query and form-body parameters of a request.
///
/// Query pairs come first, then body pairs when the `Content-Type` is
/// `application/x-www-form-urlencoded` (parameters of the media type, such
/// as `charset`, are ignored). Both sources follow form decoding rules, so
/// `+` means space here, unlike in the `Authorization` header. Duplicate
/// names are kept; normalization sorts them later.
#[must_use]
pub fn collect_request_parameters(parts: &Parts, body: &Bytes) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();

    if let Some(query) = parts.uri.query() {
        params.extend(form_urlencoded::parse(query.as_bytes()).into_owned());
    }

    if is_form_encoded(parts) && !body.is_empty() {
        params.extend(form_urlencoded::parse(body).into_owned());
    }

    params
}

fn is_form_encoded(parts: &Parts) -> bool {
    parts
        .headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| {
            media_type.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}
