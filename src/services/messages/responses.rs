//! Response types for messages service.

use crate::errors::DecodeError;
use crate::response::{empty_array_as_default, OneOrMany, Shaped};
use bytes::Bytes;
use crate::types::{Address, MessageHeaders, PersonInfo};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A message
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Message {
    /// `Message-ID` header value
    #[serde(default)]
    pub message_id: String,
    /// Subject
    #[serde(default)]
    pub subject: String,
    /// `In-Reply-To` header value
    #[serde(default)]
    pub in_reply_to: String,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
    /// Folders holding the message
    #[serde(default)]
    pub folders: Vec<String>,
    /// `References` chain
    #[serde(default)]
    pub references: Vec<String>,
    /// `Received` headers
    #[serde(default)]
    pub received_headers: Vec<String>,
    /// `List-*` headers; `[]` when absent
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub list_headers: BTreeMap<String, OneOrMany<String>>,
    /// Correspondents; `[]` when absent
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub addresses: MessageAddresses,
    /// Correspondent details; `[]` when absent
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub person_info: PersonInfo,
    /// Attachments
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Body parts, when requested
    #[serde(default)]
    pub bodies: Vec<MessageBodyPart>,
    /// Headers, when requested: a map, or one string in raw mode
    #[serde(default)]
    pub headers: Shaped<MessageHeaders>,
    /// IMAP flags, when requested
    #[serde(default)]
    pub flags: Option<MessageFlags>,
    /// `Date` header (Unix)
    #[serde(default)]
    pub sent_at: i64,
    /// Arrival time (Unix)
    #[serde(default)]
    pub received_at: i64,
}

/// Correspondents of a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageAddresses {
    /// `From`
    #[serde(default)]
    pub from: Vec<Address>,
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
}

/// Attachment metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Attachment {
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
    /// Parent message id
    #[serde(default)]
    pub message_id: String,
    /// `X-Attachment-Id`, sent as a string or a list
    #[serde(default)]
    pub x_attachment_id: Option<OneOrMany<String>>,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Attachment id used in paths
    #[serde(default)]
    pub attachment_id: i64,
}

/// Body part embedded in a message listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageBodyPart {
    /// MIME section
    #[serde(default)]
    pub body_section: String,
    /// MIME type
    #[serde(default, rename = "type")]
    pub content_type: String,
    /// Transfer encoding
    #[serde(default)]
    pub encoding: String,
    /// Decoded content
    #[serde(default)]
    pub content: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
}

/// Body part returned by the body endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageBody {
    /// MIME type
    #[serde(default, rename = "type")]
    pub content_type: String,
    /// Character set
    #[serde(default)]
    pub charset: String,
    /// Decoded content
    #[serde(default)]
    pub content: String,
    /// MIME section
    #[serde(default)]
    pub body_section: String,
}

/// IMAP flags of a message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct MessageFlags {
    /// `\Seen`
    #[serde(default)]
    pub read: bool,
    /// `\Answered`
    #[serde(default)]
    pub answered: bool,
    /// `\Flagged`
    #[serde(default)]
    pub flagged: bool,
    /// `\Draft`
    #[serde(default)]
    pub draft: bool,
}

/// Response from the flags endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageFlagsResponse {
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
    /// Flags
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub flags: MessageFlags,
}

/// Response from the headers endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageHeadersResponse {
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
    /// A map, or one string when raw headers were requested
    #[serde(default)]
    pub headers: Shaped<MessageHeaders>,
}

/// Full RFC 822 source of a message, byte for byte
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage(pub Bytes);

impl RawMessage {
    /// The message source
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The message source, if it is valid UTF-8
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Take the underlying bytes
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<Bytes> for RawMessage {
    fn from(body: Bytes) -> Self {
        Self(body)
    }
}

/// One attachment: metadata, or the raw body the service sent instead
/// (a download link when requested `as_link`).
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentContent {
    /// Attachment metadata
    Metadata(Attachment),
    /// Body that is not a JSON object, kept as received
    Raw(Bytes),
}

impl AttachmentContent {
    /// Decode a body: a JSON object is metadata, anything else is raw.
    pub fn from_body(body: Bytes) -> Result<Self, DecodeError> {
        if body.first() == Some(&b'{') {
            Ok(Self::Metadata(serde_json::from_slice(&body)?))
        } else {
            Ok(Self::Raw(body))
        }
    }

    /// Metadata, if that is what was returned
    pub fn metadata(&self) -> Option<&Attachment> {
        match self {
            Self::Metadata(attachment) => Some(attachment),
            Self::Raw(_) => None,
        }
    }

    /// Raw body, if that is what was returned
    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            Self::Metadata(_) => None,
            Self::Raw(body) => Some(body),
        }
    }

    /// Download link returned for `as_link` requests
    pub fn link(&self) -> Option<&str> {
        self.raw()
            .and_then(|body| std::str::from_utf8(body).ok())
            .map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::decode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_with_empty_sentinels() {
        let message: Message = decode(
            br#"{
                "message_id": "<a@b>",
                "subject": "hi",
                "addresses": [],
                "person_info": [],
                "list_headers": [],
                "headers": [],
                "sent_at": 1700000000
            }"#,
        )
        .unwrap();

        assert_eq!(message.addresses, MessageAddresses::default());
        assert!(message.person_info.is_empty());
        assert!(message.list_headers.is_empty());
        assert!(message.headers.is_empty());
        assert_eq!(message.sent_at, 1_700_000_000);
    }

    #[test]
    fn test_message_with_populated_fields() {
        let message: Message = decode(
            br#"{
                "addresses": {"from": [{"email": "a@b.com", "name": "A"}], "to": []},
                "person_info": {"a@b.com": {"thumbnail": "https://t/a.png"}},
                "list_headers": {"list-unsubscribe": "<mailto:u@b.com>"},
                "headers": {"Subject": ["hi"], "X-Mailer": "m"},
                "attachments": [{"type": "image/png", "x_attachment_id": ["i1", "i2"], "attachment_id": 3}]
            }"#,
        )
        .unwrap();

        assert_eq!(message.addresses.from[0].email, "a@b.com");
        assert_eq!(message.person_info["a@b.com"].thumbnail, "https://t/a.png");
        let headers = message.headers.structured().unwrap();
        assert_eq!(headers["X-Mailer"].first().map(String::as_str), Some("m"));
        assert_eq!(
            message.attachments[0]
                .x_attachment_id
                .clone()
                .map(OneOrMany::into_vec),
            Some(vec!["i1".to_string(), "i2".to_string()])
        );
    }

    #[test]
    fn test_raw_headers() {
        let response: MessageHeadersResponse =
            decode(br#"{"headers": "Subject: hi\r\nFrom: a@b.com"}"#).unwrap();
        assert_eq!(response.headers.raw(), Some("Subject: hi\r\nFrom: a@b.com"));
    }

    #[test]
    fn test_attachment_link_or_metadata() {
        let link =
            AttachmentContent::from_body(Bytes::from_static(b"https://files.example.com/x?sig=1\n"))
                .unwrap();
        assert_eq!(link.link(), Some("https://files.example.com/x?sig=1"));
        assert!(link.metadata().is_none());

        let meta =
            AttachmentContent::from_body(Bytes::from_static(br#"{"file_name": "a.pdf", "size": 10}"#))
                .unwrap();
        assert_eq!(meta.metadata().unwrap().file_name, "a.pdf");
    }

    #[test]
    fn test_attachment_body_that_looks_like_json_stays_raw() {
        let content = AttachmentContent::from_body(Bytes::from_static(b"[1,2,3]")).unwrap();
        assert_eq!(content.raw(), Some(&b"[1,2,3]"[..]));

        let binary = AttachmentContent::from_body(Bytes::from_static(b"%PDF-1.4\xff\xfe")).unwrap();
        assert_eq!(binary.raw(), Some(&b"%PDF-1.4\xff\xfe"[..]));
        assert_eq!(binary.link(), None);
    }

    #[test]
    fn test_malformed_attachment_metadata_is_decode_error() {
        assert!(AttachmentContent::from_body(Bytes::from_static(b"{not json")).is_err());
    }

    #[test]
    fn test_raw_message_keeps_bytes() {
        let latin1 = Bytes::from_static(b"Subject: caf\xe9\r\n\r\nol\xe9");
        let raw = RawMessage::from(latin1.clone());
        assert_eq!(raw.as_bytes(), &latin1[..]);
        assert_eq!(raw.to_str(), None);

        let utf8 = RawMessage::from(Bytes::from_static(b"From: a@b.com\r\n\r\nhello"));
        assert!(utf8.to_str().unwrap().ends_with("hello"));
    }
}
