//! The shared OAuth percent-encoding.
//!
//! OAuth 1.0a mandates one encoding for every context in which a value is
//! serialized: parameter normalization, base string assembly, and signing-key
//! construction. Keeping a single encoder here guarantees that a value decoded
//! during extraction re-encodes to the exact bytes the consumer signed.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters percent-encoded by [`percent_encode`].
///
/// RFC 5849 §3.6: only the RFC 3986 unreserved characters (ALPHA, DIGIT,
/// `-`, `.`, `_`, `~`) pass through bare. Everything else is encoded as
/// `%XX` with uppercase hex digits, non-ASCII input byte by byte as UTF-8.
/// Space becomes `%20`, never `+`.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a value with the OAuth 1.0a rules.
///
/// # Examples
///
/// ```
/// use signet_oauth1::percent_encode;
///
/// assert_eq!(percent_encode("abcABC123"), "abcABC123");
/// assert_eq!(percent_encode("ladies + gentlemen"), "ladies%20%2B%20gentlemen");
/// ```
#[must_use]
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Percent-decode a wire value into its logical form.
///
/// `+` is left alone; it only means space under form encoding, which is
/// handled by the query/body collector, not here. Byte sequences that do not
/// form valid UTF-8 are replaced rather than rejected so the decoder stays
/// total over adversarial input.
#[must_use]
pub fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}
