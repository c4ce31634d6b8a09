//! OAuth 1.0a provider-side request verification.
//!
//! This crate implements the verification side of OAuth 1.0a: given an
//! incoming HTTP request and a credential store, it checks that the request
//! was signed by a registered consumer with the correct secrets, that its
//! timestamp is fresh, and that its nonce has not been replayed.
//!
//! # Overview
//!
//! Parsing and base string construction come from `signet-oauth1`; this
//! crate adds the stateful half: credential resolution, replay protection,
//! and signature computation (`HMAC-SHA1` and `PLAINTEXT`, with a trait seam
//! for additional methods). The entry point is [`OAuthProvider::verify`],
//! which takes the request head and body and returns the verified identity
//! or a specific [`VerifyError`].
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use signet_provider::{OAuthProvider, ProviderConfig, StaticCredentialStore};
//!
//! let store = StaticCredentialStore::new(vec![
//!     ("dpf43f3p2l4k3l03".to_owned(), "kd94hf93k423kf44".to_owned()),
//! ]);
//! let provider = OAuthProvider::new(&ProviderConfig::default(), Arc::new(store));
//!
//! let (parts, body) = http::Request::builder()
//!     .method("GET")
//!     .uri("https://photos.example.net/photos")
//!     .header(
//!         "authorization",
//!         "OAuth oauth_consumer_key=\"dpf43f3p2l4k3l03\", \
//!          oauth_signature_method=\"PLAINTEXT\", \
//!          oauth_signature=\"kd94hf93k423kf44%26\"",
//!     )
//!     .body(Bytes::new())
//!     .unwrap()
//!     .into_parts();
//!
//! let verified = provider.verify(&parts, &body).unwrap();
//! assert_eq!(verified.consumer_key, "dpf43f3p2l4k3l03");
//! ```
//!
//! # Modules
//!
//! - [`config`] - Provider configuration, loadable from the environment
//! - [`credentials`] - Credential store trait and in-memory implementation
//! - [`error`] - Verification error types
//! - [`nonce`] - Timestamp windows and nonce replay protection
//! - [`signature`] - Signature methods and the verifier trait
//! - [`verify`] - The end-to-end verification flow

pub mod config;
pub mod credentials;
pub mod error;
pub mod nonce;
pub mod signature;
pub mod verify;

pub use config::ProviderConfig;
pub use credentials::{CredentialStore, StaticCredentialStore};
pub use error::VerifyError;
pub use nonce::{InMemoryNonceService, NonceService};
pub use signature::{
    SignatureMethod, SignatureVerifier, StandardVerifier, hmac_sha1_signature, signing_key,
};
pub use verify::{OAuthProvider, VerifiedCredentials};
