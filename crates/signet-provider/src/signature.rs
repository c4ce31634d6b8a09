//! OAuth 1.0a signature methods.
//!
//! Signatures key off the pair of shared secrets:
//!
//! ```text
//! key = encode(consumer secret) + "&" + encode(token secret)
//! ```
//!
//! For `HMAC-SHA1` the signature is `Base64(HMAC-SHA1(key, base string))`;
//! for `PLAINTEXT` it is the key itself, relying on the transport for
//! confidentiality. Comparison is constant-time in both cases.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;
use signet_oauth1::percent_encode;
use subtle::ConstantTimeEq;

use crate::error::VerifyError;

type HmacSha1 = Hmac<Sha1>;

/// The signature methods verified by [`StandardVerifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMethod {
    /// `HMAC-SHA1` per RFC 5849 §3.4.2.
    HmacSha1,
    /// `PLAINTEXT` per RFC 5849 §3.4.4.
    Plaintext,
}

impl SignatureMethod {
    /// Parse an `oauth_signature_method` value. Method names are
    /// case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::UnsupportedSignatureMethod`] for any other
    /// name. `RSA-SHA1` needs key material this crate does not manage; plug
    /// in a custom [`SignatureVerifier`] to support it.
    pub fn parse(name: &str) -> Result<Self, VerifyError> {
        match name {
            "HMAC-SHA1" => Ok(Self::HmacSha1),
            "PLAINTEXT" => Ok(Self::Plaintext),
            other => Err(VerifyError::UnsupportedSignatureMethod(other.to_owned())),
        }
    }

    /// The wire name of this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha1 => "HMAC-SHA1",
            Self::Plaintext => "PLAINTEXT",
        }
    }
}

/// Assemble the signing key from the two shared secrets.
///
/// Both secrets pass through the shared percent-encoder before being joined
/// with `&`, so a secret containing `&` or non-ASCII bytes keys the HMAC
/// exactly as the consumer computed it. Two-legged requests use an empty
/// token secret.
#[must_use]
pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret))
}

/// Compute `Base64(HMAC-SHA1(key, base_string))`.
#[must_use]
pub fn hmac_sha1_signature(key: &str, base_string: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .expect("HMAC can accept keys of any length");
    mac.update(base_string.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Signature verification collaborator.
///
/// Receives the base string, the method name the consumer declared, the
/// resolved secrets, and the decoded presented signature, and reports
/// whether they match.
pub trait SignatureVerifier: Send + Sync {
    /// Check the presented signature against the request.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::UnsupportedSignatureMethod`] when the method
    /// is not one this verifier implements.
    fn verify(
        &self,
        method: &str,
        base_string: &str,
        consumer_secret: &str,
        token_secret: &str,
        provided: &str,
    ) -> Result<bool, VerifyError>;
}

/// The built-in verifier: `HMAC-SHA1` and `PLAINTEXT` under constant-time
/// comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardVerifier;

impl SignatureVerifier for StandardVerifier {
    fn verify(
        &self,
        method: &str,
        base_string: &str,
        consumer_secret: &str,
        token_secret: &str,
        provided: &str,
    ) -> Result<bool, VerifyError> {
        let key = signing_key(consumer_secret, token_secret);
        let expected = match SignatureMethod::parse(method)? {
            SignatureMethod::HmacSha1 => hmac_sha1_signature(&key, base_string),
            SignatureMethod::Plaintext => key,
        };
        Ok(provided.as_bytes().ct_eq(expected.as_bytes()).into())
    }
}
