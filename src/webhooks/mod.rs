//! Inbound callback payloads and signature verification.
//!
//! The service signs every webhook and account status callback with
//! HMAC-SHA256 over the decimal timestamp followed by the token, keyed by
//! the application secret. Route each callback through
//! [`CallbackVerifier`] (or `LiteClient::validate_callback`) before trusting
//! it.

use crate::auth::sign;
use crate::errors::LiteResult;
use crate::response::{decode, empty_array_as_default, OneOrMany};
use crate::types::{Address, MessageHeaders, PersonInfo};
use constant_time_eq::constant_time_eq;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};

/// Webhook callback verifier
pub struct CallbackVerifier {
    secret: SecretString,
}

impl CallbackVerifier {
    /// Create a verifier keyed by the application secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Check a callback's `signature` against `timestamp` and `token`.
    ///
    /// Never fails: an unset secret or an empty computed hash yields
    /// `false`.
    pub fn verify_callback(&self, token: &str, signature: &str, timestamp: i64) -> bool {
        let secret = self.secret.expose_secret();
        if secret.is_empty() {
            warn!("Callback secret is empty, rejecting callback");
            return false;
        }

        let message = format!("{}{}", timestamp, token);
        let expected = sign(message.as_bytes(), secret.as_bytes());
        if expected.is_empty() {
            warn!("Computed callback signature is empty, rejecting callback");
            return false;
        }

        let valid = constant_time_eq(expected.as_bytes(), signature.as_bytes());
        if valid {
            debug!(timestamp, "Callback signature verified");
        } else {
            warn!(timestamp, "Callback signature mismatch");
        }
        valid
    }

    /// Check a decoded webhook callback
    pub fn verify(&self, callback: &WebhookCallback) -> bool {
        self.verify_callback(&callback.token, &callback.signature, callback.timestamp)
    }

    /// Check a decoded account status callback
    pub fn verify_account_status(&self, callback: &AccountStatusCallback) -> bool {
        self.verify_callback(&callback.token, &callback.signature, callback.timestamp)
    }
}

impl fmt::Debug for CallbackVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Body of a webhook delivery
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WebhookCallback {
    /// Account the event belongs to
    #[serde(default)]
    pub account_id: String,
    /// Webhook that fired
    #[serde(default)]
    pub webhook_id: String,
    /// Signed nonce
    #[serde(default)]
    pub token: String,
    /// Hex HMAC-SHA256 of `timestamp + token`
    #[serde(default)]
    pub signature: String,
    /// Unix seconds
    #[serde(default)]
    pub timestamp: i64,
    /// Failure detail, set when the webhook was suspended
    #[serde(default)]
    pub data: String,
    /// The message that triggered the event
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub message_data: WebhookMessageData,
}

impl WebhookCallback {
    /// Decode a raw delivery body
    pub fn from_slice(body: &[u8]) -> LiteResult<Self> {
        Ok(decode(body)?)
    }

    /// Whether this delivery reports a suspended webhook
    pub fn is_failure(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Message metadata carried by a webhook delivery
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WebhookMessageData {
    /// `Message-ID`
    #[serde(default)]
    pub message_id: String,
    /// Subject
    #[serde(default)]
    pub subject: String,
    /// `References` chain
    #[serde(default)]
    pub references: Vec<String>,
    /// Folders holding the message
    #[serde(default)]
    pub folders: Vec<String>,
    /// `Date` header (Unix)
    #[serde(default)]
    pub date: i64,
    /// Arrival time (Unix)
    #[serde(default)]
    pub date_received: i64,
    /// Correspondents; `[]` when absent
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub addresses: WebhookAddresses,
    /// Correspondent details; `[]` when absent
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub person_info: PersonInfo,
    /// IMAP flags
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub flags: WebhookFlags,
    /// Where the message was found
    #[serde(default)]
    pub sources: Vec<WebhookMessageLocation>,
    /// Accounts holding the message
    #[serde(default)]
    pub email_accounts: Vec<WebhookMessageLocation>,
    /// Attachments
    #[serde(default)]
    pub files: Vec<WebhookFile>,
    /// Body parts, when the webhook asks for them
    #[serde(default)]
    pub bodies: Vec<WebhookBody>,
    /// Headers, when the webhook asks for them
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub headers: MessageHeaders,
}

/// Correspondents of a webhook message
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebhookAddresses {
    /// `From`; a single address in deliveries
    #[serde(default)]
    pub from: Option<OneOrMany<Address>>,
    /// `To`
    #[serde(default)]
    pub to: Vec<Address>,
    /// `Cc`
    #[serde(default)]
    pub cc: Vec<Address>,
    /// `Bcc`
    #[serde(default)]
    pub bcc: Vec<Address>,
    /// `Sender`
    #[serde(default)]
    pub sender: Vec<Address>,
    /// `Reply-To`
    #[serde(default)]
    pub reply_to: Vec<Address>,
    /// `Return-Path`
    #[serde(default)]
    pub return_path: Vec<Address>,
}

impl WebhookAddresses {
    /// First `From` address, if any
    pub fn sender_address(&self) -> Option<&Address> {
        self.from.as_ref().and_then(OneOrMany::first)
    }
}

/// IMAP flags of a webhook message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct WebhookFlags {
    /// `\Flagged`
    #[serde(default)]
    pub flagged: bool,
    /// `\Answered`
    #[serde(default)]
    pub answered: bool,
    /// `\Draft`
    #[serde(default)]
    pub draft: bool,
    /// `\Seen`
    #[serde(default)]
    pub seen: bool,
}

/// Account and folder holding a webhook message
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebhookMessageLocation {
    /// Account label
    #[serde(default)]
    pub label: String,
    /// Folder name
    #[serde(default)]
    pub folder: String,
    /// IMAP UID
    #[serde(default)]
    pub uid: u64,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
}

/// Attachment of a webhook message
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebhookFile {
    /// `Content-ID`
    #[serde(default)]
    pub content_id: String,
    /// MIME type
    #[serde(default, rename = "type")]
    pub content_type: String,
    /// File name
    #[serde(default)]
    pub file_name: String,
    /// MIME section
    #[serde(default)]
    pub body_section: String,
    /// `Content-Disposition`
    #[serde(default)]
    pub content_disposition: String,
    /// File name without extension
    #[serde(default)]
    pub main_file_name: String,
    /// `X-Attachment-Id`, a string or a list
    #[serde(default)]
    pub x_attachment_id: Option<OneOrMany<String>>,
    /// Tokenized file name
    #[serde(default)]
    pub file_name_structure: Vec<Vec<String>>,
    /// Attachment id used in paths
    #[serde(default)]
    pub attachment_id: i64,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Inline rather than attached
    #[serde(default)]
    pub is_embedded: bool,
}

/// Body part of a webhook message
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebhookBody {
    /// MIME type
    #[serde(default, rename = "type")]
    pub content_type: String,
    /// Character set
    #[serde(default)]
    pub charset: String,
    /// MIME section
    #[serde(default)]
    pub body_section: String,
    /// Decoded content
    #[serde(default)]
    pub content: String,
}

/// Body of an account status callback
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountStatusCallback {
    /// User owning the account
    #[serde(default)]
    pub user_id: String,
    /// Account label
    #[serde(default)]
    pub email_account_label: String,
    /// Server label
    #[serde(default)]
    pub server_label: String,
    /// New account status, e.g. `INVALID_CREDENTIALS`
    #[serde(default)]
    pub status: String,
    /// Signed nonce
    #[serde(default)]
    pub token: String,
    /// Hex HMAC-SHA256 of `timestamp + token`
    #[serde(default)]
    pub signature: String,
    /// Unix seconds
    #[serde(default)]
    pub timestamp: i64,
}

impl AccountStatusCallback {
    /// Decode a raw delivery body
    pub fn from_slice(body: &[u8]) -> LiteResult<Self> {
        Ok(decode(body)?)
    }
}
