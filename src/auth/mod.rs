//! Request authentication and message signing.
//!
//! Two keyed hashes are in play:
//! - [`sign`] is HMAC-SHA256 rendered as lowercase hex. It is what the
//!   service uses to sign webhook and account status callbacks.
//! - [`OAuthSigner`] produces the two-legged OAuth 1.0 (`HMAC-SHA1`)
//!   `Authorization` header every outbound API call carries.

use crate::config::Credential;
use crate::request::path::rfc3986_encode;
use crate::transport::HttpMethod;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use ring::hmac as ring_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// OAuth signature method sent to the service
pub const OAUTH_SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// OAuth protocol version sent to the service
pub const OAUTH_VERSION: &str = "1.0";

/// HMAC-SHA256 of `message` keyed by `secret`, hex encoded.
///
/// Returns an empty string if the MAC cannot be keyed, which callers treat
/// as "never matches".
pub fn sign(message: &[u8], secret: &[u8]) -> String {
    match HmacSha256::new_from_slice(secret) {
        Ok(mut mac) => {
            mac.update(message);
            hex::encode(mac.finalize().into_bytes())
        }
        Err(_) => String::new(),
    }
}

/// Two-legged OAuth 1.0 signer (consumer key and secret, no token).
#[derive(Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: SecretString,
}

impl OAuthSigner {
    /// Create a signer for the given credential
    pub fn new(credential: &Credential) -> Self {
        Self {
            consumer_key: credential.key().to_string(),
            consumer_secret: SecretString::new(credential.expose_secret().to_string()),
        }
    }

    /// Build the `Authorization` header value with a fresh nonce and timestamp.
    pub fn authorization_header(
        &self,
        method: HttpMethod,
        url: &Url,
        form: &[(String, String)],
    ) -> String {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp();
        self.authorization_header_with(method, url, form, &nonce, timestamp)
    }

    /// Build the `Authorization` header value for a fixed nonce and timestamp.
    pub fn authorization_header_with(
        &self,
        method: HttpMethod,
        url: &Url,
        form: &[(String, String)],
        nonce: &str,
        timestamp: i64,
    ) -> String {
        let timestamp = timestamp.to_string();
        let oauth_params = [
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", OAUTH_SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ];

        let base = signature_base_string(method, url, form, &oauth_params);
        let signature = self.signature(&base);

        let mut header = String::from("OAuth ");
        let mut fields: Vec<(&str, String)> = oauth_params
            .iter()
            .map(|(k, v)| (*k, v.to_string()))
            .collect();
        fields.push(("oauth_signature", signature));
        fields.sort_by(|a, b| a.0.cmp(b.0));

        let rendered: Vec<String> = fields
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, rfc3986_encode(v)))
            .collect();
        header.push_str(&rendered.join(", "));
        header
    }

    fn signature(&self, base: &str) -> String {
        let signing_key = format!(
            "{}&",
            rfc3986_encode(self.consumer_secret.expose_secret())
        );
        let key = ring_hmac::Key::new(
            ring_hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            signing_key.as_bytes(),
        );
        STANDARD.encode(ring_hmac::sign(&key, base.as_bytes()).as_ref())
    }
}

impl std::fmt::Debug for OAuthSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSigner")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .finish()
    }
}

/// `METHOD&enc(base_url)&enc(sorted params)`
pub(crate) fn signature_base_string(
    method: HttpMethod,
    url: &Url,
    form: &[(String, String)],
    oauth_params: &[(&str, &str)],
) -> String {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (rfc3986_encode(&k), rfc3986_encode(&v)))
        .collect();
    params.extend(
        form.iter()
            .map(|(k, v)| (rfc3986_encode(k), rfc3986_encode(v))),
    );
    params.extend(
        oauth_params
            .iter()
            .map(|(k, v)| (rfc3986_encode(k), rfc3986_encode(v))),
    );
    params.sort();

    let normalized_params = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str(),
        rfc3986_encode(&base_url(url)),
        rfc3986_encode(&normalized_params)
    )
}

/// Scheme, host, non-default port and path; no query or fragment.
fn base_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
        None => format!("{}://{}{}", url.scheme(), host, url.path()),
    }
}
