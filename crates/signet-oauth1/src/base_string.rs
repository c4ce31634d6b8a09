//! Signature base string construction per RFC 5849 §3.4.1.
//!
//! The base string is the canonical serialization both sides sign: the
//! uppercased method, the normalized request URL, and the normalized
//! parameter collection, each percent-encoded and joined with `&`. The
//! output is deterministic for a given request, whatever order the
//! parameters arrived in.

use http::Uri;
use tracing::debug;

use crate::encode::percent_encode;
use crate::error::ProtocolError;
use crate::params::ParameterSet;

/// Builds signature base strings for incoming requests.
///
/// By default the signed URL is derived from the request URI. Deployments
/// behind proxies that rewrite scheme, host, or port can pin the externally
/// visible base URL instead with [`BaseStringBuilder::with_base_url`].
#[derive(Debug, Clone, Default)]
pub struct BaseStringBuilder {
    base_url: Option<String>,
}

impl BaseStringBuilder {
    /// Create a builder that derives the signed URL from the request URI.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the scheme/host/port of the signed URL.
    ///
    /// The configured value is used verbatim, so it must already be in the
    /// normalized form consumers sign (lowercase scheme and host, no default
    /// port). The request path is appended to it, with a `/` inserted only
    /// when neither side supplies one.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Compute the signature base string for a request.
    ///
    /// `credentials` are the extracted protocol parameters; `request_params`
    /// the decoded query/body pairs. The two collections are merged under
    /// the rule that the credential set owns every name it contains, so
    /// credentials delivered through the query string are not counted twice.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidRequestUrl`] when no base URL is
    /// configured and the request URI lacks a scheme or host, as origin-form
    /// URIs do.
    ///
    /// # Examples
    ///
    /// ```
    /// use http::Uri;
    /// use signet_oauth1::{BaseStringBuilder, ParameterSet};
    ///
    /// let uri = Uri::from_static("http://photos.example.net/photos?size=original");
    /// let base = BaseStringBuilder::new()
    ///     .build("get", &uri, &ParameterSet::new(), &[("size".into(), "original".into())])
    ///     .unwrap();
    /// assert_eq!(base, "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&size%3Doriginal");
    /// ```
    pub fn build(
        &self,
        method: &str,
        uri: &Uri,
        credentials: &ParameterSet,
        request_params: &[(String, String)],
    ) -> Result<String, ProtocolError> {
        let url = self.signed_url(uri)?;
        let normalized = normalize_parameters(credentials, request_params);
        let base = format!(
            "{}&{}&{}",
            method.to_ascii_uppercase(),
            percent_encode(&url),
            percent_encode(&normalized)
        );
        debug!(base_string = %base, "Built signature base string");
        Ok(base)
    }

    fn signed_url(&self, uri: &Uri) -> Result<String, ProtocolError> {
        if let Some(base) = &self.base_url {
            return Ok(glue_base_url(base, uri.path()));
        }
        normalize_url(uri)
    }
}

/// Normalize a request URL per RFC 5849 §3.4.1.2.
///
/// Scheme and host are lowercased, the port is kept only when it is not the
/// scheme default, the path is carried verbatim (empty becomes `/`), and
/// query and fragment are dropped.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidRequestUrl`] when the URI has no scheme
/// or no host.
pub fn normalize_url(uri: &Uri) -> Result<String, ProtocolError> {
    let scheme = uri
        .scheme_str()
        .ok_or_else(|| ProtocolError::InvalidRequestUrl("missing scheme".to_owned()))?
        .to_ascii_lowercase();
    let host = uri
        .host()
        .ok_or_else(|| ProtocolError::InvalidRequestUrl("missing host".to_owned()))?
        .to_ascii_lowercase();
    let path = match uri.path() {
        "" => "/",
        path => path,
    };

    let mut url = match uri.port_u16() {
        Some(port) if !is_default_port(&scheme, port) => format!("{scheme}://{host}:{port}"),
        _ => format!("{scheme}://{host}"),
    };
    url.push_str(path);
    Ok(url)
}

/// Normalize the signed parameters into the sorted `name=value&...` string
/// of RFC 5849 §3.4.1.3.2.
///
/// Every occurrence of a multi-valued name is kept, each name and value is
/// percent-encoded independently, and entries are ordered by encoded name,
/// then encoded value. Request parameters whose name appears in the
/// credential set are skipped; the extracted value is authoritative for
/// those names.
#[must_use]
pub fn normalize_parameters(
    credentials: &ParameterSet,
    request_params: &[(String, String)],
) -> String {
    let mut pairs: Vec<(String, String)> = request_params
        .iter()
        .filter(|(name, _)| !credentials.contains(name))
        .map(|(name, value)| (percent_encode(name), percent_encode(value)))
        .collect();
    pairs.extend(
        credentials
            .signed_entries()
            .map(|(name, value)| (percent_encode(name), percent_encode(value))),
    );
    pairs.sort_unstable();

    pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Join a pinned base URL and a request path, inserting a `/` only when
/// neither side supplies one.
fn glue_base_url(base: &str, path: &str) -> String {
    let mut url = String::with_capacity(base.len() + path.len() + 1);
    url.push_str(base);
    if !path.is_empty() {
        if !base.ends_with('/') && !path.starts_with('/') {
            url.push('/');
        }
        url.push_str(path);
    }
    url
}

fn is_default_port(scheme: &str, port: u16) -> bool {
    matches!((scheme, port), ("http", 80) | ("https", 443))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::header::ParameterExtractor;
    use crate::request::collect_request_parameters;

    #[test]
    fn test_should_build_documented_photos_base_string() {
        let (parts, body) = http::Request::builder()
            .method("gEt")
            .uri("http://photos.example.net/photos?file=vacation.jpg&size=original")
            .header(
                http::header::AUTHORIZATION,
                "OAuth realm=\"http://sp.example.com/\", oauth_consumer_key=\"dpf43f3p2l4k3l03\", \
                 oauth_token=\"nnch734d00sl2jdk\", oauth_signature_method=\"HMAC-SHA1\", \
                 oauth_signature=\"unimportantforthistest\", oauth_timestamp=\"1191242096\", \
                 oauth_nonce=\"kllo9940pd9333jh\", oauth_version=\"1.0\"",
            )
            .body(Bytes::new())
            .unwrap()
            .into_parts();

        let request_params = collect_request_parameters(&parts, &body);
        let credentials = ParameterExtractor::new()
            .extract(&parts, &request_params)
            .unwrap()
            .expect("credentials presented");

        let base = BaseStringBuilder::new()
            .build(parts.method.as_str(), &parts.uri, &credentials, &request_params)
            .unwrap();

        assert_eq!(
            base,
            "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26\
             oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26\
             oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
        );
    }

    #[test]
    fn test_should_build_rfc_example_with_body_parameters() {
        let (parts, body) = http::Request::builder()
            .method("POST")
            .uri("http://example.com/request?b5=%3D%253D&a3=a&c%40=&a2=r%20b")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Bytes::from_static(b"c2&a3=2+q"))
            .unwrap()
            .into_parts();

        let request_params = collect_request_parameters(&parts, &body);
        let mut credentials = ParameterSet::new();
        credentials.insert("realm", "Example");
        credentials.insert("oauth_consumer_key", "9djdj82h48djs9d2");
        credentials.insert("oauth_token", "kkk9d7dh3k39sjv7");
        credentials.insert("oauth_signature_method", "HMAC-SHA1");
        credentials.insert("oauth_timestamp", "137131201");
        credentials.insert("oauth_nonce", "7d8f3e4a");
        credentials.insert("oauth_signature", "bYT5CMsGcbgUdFHObYMEfcx6bsw=");

        let base = BaseStringBuilder::new()
            .build(parts.method.as_str(), &parts.uri, &credentials, &request_params)
            .unwrap();

        assert_eq!(
            base,
            "POST&http%3A%2F%2Fexample.com%2Frequest&a2%3Dr%2520b%26a3%3D2%2520q%26a3%3Da%26\
             b5%3D%253D%25253D%26c%2540%3D%26c2%3D%26oauth_consumer_key%3D9djdj82h48djs9d2%26\
             oauth_nonce%3D7d8f3e4a%26oauth_signature_method%3DHMAC-SHA1%26\
             oauth_timestamp%3D137131201%26oauth_token%3Dkkk9d7dh3k39sjv7"
        );
    }

    #[test]
    fn test_should_uppercase_the_method() {
        let uri = Uri::from_static("http://example.com/r");
        let base = BaseStringBuilder::new()
            .build("post", &uri, &ParameterSet::new(), &[])
            .unwrap();
        assert!(base.starts_with("POST&"));
    }

    #[test]
    fn test_should_lowercase_scheme_and_host_but_not_path() {
        let uri = Uri::from_static("http://PHOTOS.Example.NET/Photos");
        assert_eq!(normalize_url(&uri).unwrap(), "http://photos.example.net/Photos");
    }

    #[test]
    fn test_should_suppress_default_ports() {
        let uri = Uri::from_static("http://photos.example.net:80/photos");
        assert_eq!(normalize_url(&uri).unwrap(), "http://photos.example.net/photos");

        let uri = Uri::from_static("https://photos.example.net:443/photos");
        assert_eq!(normalize_url(&uri).unwrap(), "https://photos.example.net/photos");
    }

    #[test]
    fn test_should_keep_non_default_ports() {
        let uri = Uri::from_static("http://photos.example.net:8080/photos");
        assert_eq!(normalize_url(&uri).unwrap(), "http://photos.example.net:8080/photos");

        // 443 is only a default for https.
        let uri = Uri::from_static("http://photos.example.net:443/photos");
        assert_eq!(normalize_url(&uri).unwrap(), "http://photos.example.net:443/photos");
    }

    #[test]
    fn test_should_default_empty_path_to_slash() {
        let uri = Uri::from_static("http://example.com");
        assert_eq!(normalize_url(&uri).unwrap(), "http://example.com/");
    }

    #[test]
    fn test_should_drop_query_from_normalized_url() {
        let uri = Uri::from_static("http://example.com/r?x=1&y=2");
        assert_eq!(normalize_url(&uri).unwrap(), "http://example.com/r");
    }

    #[test]
    fn test_should_fail_on_origin_form_uri_without_base_url() {
        let uri = Uri::from_static("/photos");
        let result = BaseStringBuilder::new().build("GET", &uri, &ParameterSet::new(), &[]);
        assert!(matches!(result, Err(ProtocolError::InvalidRequestUrl(_))));
    }

    #[test]
    fn test_should_use_pinned_base_url_verbatim() {
        let uri = Uri::from_static("/photos");
        let base = BaseStringBuilder::new()
            .with_base_url("https://SP.example.com:8443")
            .build("GET", &uri, &ParameterSet::new(), &[])
            .unwrap();
        assert_eq!(base, "GET&https%3A%2F%2FSP.example.com%3A8443%2Fphotos&");
    }

    #[test]
    fn test_should_glue_base_url_and_path() {
        assert_eq!(
            glue_base_url("http://photos.example.net", "/photos"),
            "http://photos.example.net/photos"
        );
        assert_eq!(
            glue_base_url("http://photos.example.net", "photos"),
            "http://photos.example.net/photos"
        );
        assert_eq!(
            glue_base_url("http://photos.example.net/sp/", "photos"),
            "http://photos.example.net/sp/photos"
        );
        assert_eq!(glue_base_url("http://photos.example.net", ""), "http://photos.example.net");
    }

    #[test]
    fn test_should_keep_every_value_of_multivalued_parameters() {
        let params = vec![
            ("a".to_owned(), "2".to_owned()),
            ("a".to_owned(), "1".to_owned()),
        ];
        assert_eq!(normalize_parameters(&ParameterSet::new(), &params), "a=1&a=2");
    }

    #[test]
    fn test_should_keep_empty_values() {
        let params = vec![("empty".to_owned(), String::new())];
        assert_eq!(normalize_parameters(&ParameterSet::new(), &params), "empty=");
    }

    #[test]
    fn test_should_sort_by_encoded_name() {
        // "a b" encodes to "a%20b", which sorts before "a-b".
        let params = vec![
            ("a-b".to_owned(), "2".to_owned()),
            ("a b".to_owned(), "1".to_owned()),
        ];
        assert_eq!(normalize_parameters(&ParameterSet::new(), &params), "a%20b=1&a-b=2");
    }

    #[test]
    fn test_should_normalize_independently_of_input_order() {
        let forward = vec![
            ("size".to_owned(), "original".to_owned()),
            ("file".to_owned(), "vacation.jpg".to_owned()),
            ("size".to_owned(), "large".to_owned()),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(
            normalize_parameters(&ParameterSet::new(), &forward),
            normalize_parameters(&ParameterSet::new(), &reversed)
        );
    }

    #[test]
    fn test_should_not_double_count_credentials_delivered_in_query() {
        let mut credentials = ParameterSet::new();
        credentials.insert("oauth_token", "nnch734d00sl2jdk");
        let params = vec![
            ("oauth_token".to_owned(), "nnch734d00sl2jdk".to_owned()),
            ("file".to_owned(), "vacation.jpg".to_owned()),
        ];
        assert_eq!(
            normalize_parameters(&credentials, &params),
            "file=vacation.jpg&oauth_token=nnch734d00sl2jdk"
        );
    }
}
