//! The extracted parameter model.
//!
//! [`ParameterSet`] is what extraction produces: the decoded protocol
//! parameters a request presented, keyed by wire name. It is built once per
//! request and treated as read-only afterwards.

use std::collections::BTreeMap;
use std::fmt;

/// The parameter names reserved by the OAuth 1.0a protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthParameter {
    /// `oauth_consumer_key`
    ConsumerKey,
    /// `oauth_token`
    Token,
    /// `oauth_signature_method`
    SignatureMethod,
    /// `oauth_signature`
    Signature,
    /// `oauth_timestamp`
    Timestamp,
    /// `oauth_nonce`
    Nonce,
    /// `oauth_version`
    Version,
    /// `oauth_callback`
    Callback,
    /// `oauth_verifier`
    Verifier,
    /// `realm` (header-only; names the protection space, never signed)
    Realm,
}

impl OAuthParameter {
    /// The wire name of this parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConsumerKey => "oauth_consumer_key",
            Self::Token => "oauth_token",
            Self::SignatureMethod => "oauth_signature_method",
            Self::Signature => "oauth_signature",
            Self::Timestamp => "oauth_timestamp",
            Self::Nonce => "oauth_nonce",
            Self::Version => "oauth_version",
            Self::Callback => "oauth_callback",
            Self::Verifier => "oauth_verifier",
            Self::Realm => "realm",
        }
    }
}

impl fmt::Display for OAuthParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The decoded OAuth parameters presented by a request.
///
/// Values are stored in logical (percent-decoded) form. When a name is
/// repeated across sources the last occurrence wins; the protocol gives every
/// reserved parameter a single value, so duplicates only arise from malformed
/// or hostile input.
///
/// The set also carries `realm` when the header supplied one. `realm` and
/// `oauth_signature` are part of the presented credentials but never part of
/// the signed material; [`ParameterSet::signed_entries`] excludes both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    params: BTreeMap<String, String>,
}

impl ParameterSet {
    /// Create an empty set.
    ///
    /// Extraction is the usual way to obtain a populated set; building one by
    /// hand is useful for tests and for consumer-role signers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a decoded parameter, replacing any previous value of the name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    /// Look up a parameter by wire name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Whether the set contains the given name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// `oauth_consumer_key`, if present.
    #[must_use]
    pub fn consumer_key(&self) -> Option<&str> {
        self.get(OAuthParameter::ConsumerKey.as_str())
    }

    /// `oauth_token`, if present.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.get(OAuthParameter::Token.as_str())
    }

    /// `oauth_signature_method`, if present.
    #[must_use]
    pub fn signature_method(&self) -> Option<&str> {
        self.get(OAuthParameter::SignatureMethod.as_str())
    }

    /// `oauth_signature`, if present.
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        self.get(OAuthParameter::Signature.as_str())
    }

    /// `oauth_timestamp`, if present.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.get(OAuthParameter::Timestamp.as_str())
    }

    /// `oauth_nonce`, if present.
    #[must_use]
    pub fn nonce(&self) -> Option<&str> {
        self.get(OAuthParameter::Nonce.as_str())
    }

    /// `oauth_version`, if present.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.get(OAuthParameter::Version.as_str())
    }

    /// `oauth_callback`, if present.
    #[must_use]
    pub fn callback(&self) -> Option<&str> {
        self.get(OAuthParameter::Callback.as_str())
    }

    /// `oauth_verifier`, if present.
    #[must_use]
    pub fn verifier(&self) -> Option<&str> {
        self.get(OAuthParameter::Verifier.as_str())
    }

    /// `realm`, if the header supplied one.
    #[must_use]
    pub fn realm(&self) -> Option<&str> {
        self.get(OAuthParameter::Realm.as_str())
    }

    /// Whether the set holds no parameters at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of parameters held, `realm` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Iterate every entry in wire-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate the entries that participate in the signature base string:
    /// everything except `realm` and `oauth_signature`.
    pub fn signed_entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.iter().filter(|(name, _)| {
            *name != OAuthParameter::Realm.as_str() && *name != OAuthParameter::Signature.as_str()
        })
    }
}
