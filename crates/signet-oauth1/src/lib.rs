//! OAuth 1.0a credential extraction and signature base string construction.
//!
//! This crate implements the request-parsing half of an OAuth 1.0a provider:
//! given an incoming HTTP request, it recovers the protocol parameters the
//! consumer sent (from the `Authorization` header or, as a fallback, from the
//! query string and form body) and reconstructs the signature base string the
//! consumer signed.
//!
//! # Overview
//!
//! OAuth 1.0a authenticates requests by signing a canonical serialization of
//! the request, the signature base string. Both sides must derive the exact
//! same byte string or verification fails, so every step here follows RFC 5849
//! to the letter: one shared percent-encoder, lexicographic parameter
//! ordering, and scheme/host/port normalization of the request URL. Actual
//! signature computation lives in `signet-provider`; this crate is the pure,
//! allocation-only core with no crypto and no clocks.
//!
//! # Usage
//!
//! ```rust
//! use signet_oauth1::{BaseStringBuilder, ParameterExtractor, collect_request_parameters};
//!
//! let (parts, body) = http::Request::builder()
//!     .method("GET")
//!     .uri("http://photos.example.net/photos?file=vacation.jpg&size=original")
//!     .header(
//!         "authorization",
//!         "OAuth oauth_consumer_key=\"dpf43f3p2l4k3l03\", oauth_token=\"nnch734d00sl2jdk\"",
//!     )
//!     .body(bytes::Bytes::new())
//!     .unwrap()
//!     .into_parts();
//!
//! let request_params = collect_request_parameters(&parts, &body);
//! let credentials = ParameterExtractor::new()
//!     .extract(&parts, &request_params)
//!     .unwrap()
//!     .expect("credentials presented");
//! assert_eq!(credentials.consumer_key(), Some("dpf43f3p2l4k3l03"));
//!
//! let base = BaseStringBuilder::new()
//!     .build(parts.method.as_str(), &parts.uri, &credentials, &request_params)
//!     .unwrap();
//! assert!(base.starts_with("GET&http%3A%2F%2Fphotos.example.net%2Fphotos&"));
//! ```
//!
//! # Modules
//!
//! - [`base_string`] - Signature base string construction per RFC 5849 §3.4.1
//! - [`encode`] - The shared OAuth percent-encoding
//! - [`error`] - Protocol error types
//! - [`header`] - `Authorization` header parsing and credential extraction
//! - [`params`] - The extracted parameter model
//! - [`request`] - Query string and form body parameter collection

pub mod base_string;
pub mod encode;
pub mod error;
pub mod header;
pub mod params;
pub mod request;

pub use base_string::{BaseStringBuilder, normalize_parameters, normalize_url};
pub use encode::{percent_decode, percent_encode};
pub use error::ProtocolError;
pub use header::{ParameterExtractor, SchemeMatch};
pub use params::{OAuthParameter, ParameterSet};
pub use request::collect_request_parameters;
