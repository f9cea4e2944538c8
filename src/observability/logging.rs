//! Logging utilities with sensitive data redaction.

use std::fmt;
use url::Url;

const REDACTED: &str = "[REDACTED]";

/// Parameter names whose values never appear in logs or hook arguments
pub const SENSITIVE_PARAMS: &[&str] = &[
    "password",
    "provider_refresh_token",
    "provider_token",
    "provider_token_secret",
    "provider_consumer_secret",
    "consumer_secret",
    "oauth_signature",
];

/// Wrapper for sensitive data that redacts on display
#[derive(Clone)]
pub struct Redacted<T>(T);

impl<T> Redacted<T> {
    /// Create a new redacted value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Get the inner value (use sparingly)
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T> fmt::Debug for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Whether a parameter name carries a secret
pub fn is_sensitive(name: &str) -> bool {
    SENSITIVE_PARAMS
        .iter()
        .any(|s| name.eq_ignore_ascii_case(s))
}

/// Copy of `pairs` with sensitive values replaced
pub fn redact_params(pairs: &[(String, String)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| {
            if is_sensitive(k) {
                (k.clone(), REDACTED.to_string())
            } else {
                (k.clone(), v.clone())
            }
        })
        .collect()
}

/// Render a URL with sensitive query parameters replaced
pub fn redact_url(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if !pairs.iter().any(|(k, _)| is_sensitive(k)) {
        return url.to_string();
    }

    let mut redacted = url.clone();
    redacted
        .query_pairs_mut()
        .clear()
        .extend_pairs(redact_params(&pairs));
    redacted.to_string()
}
