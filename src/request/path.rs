//! Percent-encoding for path segments and OAuth parameters.

use crate::errors::RequestError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// RFC 3986 unreserved characters are left as-is, everything else is encoded.
///
/// Unlike form encoding, a space becomes `%20` (never `+`) and `/` is always
/// encoded, so a folder such as `INBOX/Sent Items` stays one segment.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a string with the RFC 3986 unreserved set.
pub fn rfc3986_encode(input: &str) -> String {
    utf8_percent_encode(input, UNRESERVED).to_string()
}

/// Escape a caller-supplied identifier for use as one path segment.
///
/// `.` and `..` are rejected: URL parsing resolves them (escaped or not) as
/// relative steps, which would retarget the request at a parent resource.
pub fn escape_segment(segment: &str) -> Result<String, RequestError> {
    if is_dot_segment(segment) {
        return Err(RequestError::InvalidPathSegment {
            segment: segment.to_string(),
        });
    }
    Ok(rfc3986_encode(segment))
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

/// Join literal path pieces and escaped identifiers.
///
/// ```
/// use contextio_lite::request::path::{build_path, Segment};
///
/// let path = build_path(&[
///     Segment::Literal("lite/users"),
///     Segment::Id("u1"),
///     Segment::Literal("email_accounts"),
///     Segment::Id("me@example.com"),
///     Segment::Literal("folders"),
///     Segment::Id("INBOX/Sent Items"),
/// ])
/// .unwrap();
/// assert_eq!(
///     path,
///     "/lite/users/u1/email_accounts/me%40example.com/folders/INBOX%2FSent%20Items"
/// );
/// ```
pub fn build_path(segments: &[Segment<'_>]) -> Result<String, RequestError> {
    let mut path = String::new();
    for segment in segments {
        path.push('/');
        match segment {
            Segment::Literal(s) => path.push_str(s.trim_matches('/')),
            Segment::Id(s) => path.push_str(&escape_segment(s)?),
        }
    }
    Ok(path)
}

/// A piece of an endpoint path
#[derive(Debug, Clone, Copy)]
pub enum Segment<'a> {
    /// Fixed resource name, inserted verbatim
    Literal(&'a str),
    /// Caller-supplied identifier, escaped
    Id(&'a str),
}
