//! Request types for messages service.

use crate::request::{is_false, is_zero};
use serde::Serialize;

/// How message headers are returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncludeHeaders {
    /// No headers
    #[serde(rename = "0")]
    No,
    /// Parsed into a map
    #[serde(rename = "1")]
    Parsed,
    /// As one raw string
    #[serde(rename = "raw")]
    Raw,
}

/// Options for fetching one message
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetMessageRequest {
    /// Folder separator
    #[serde(skip_serializing_if = "String::is_empty")]
    pub delimiter: String,
    /// MIME type of the body parts to include
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body_type: String,
    /// Include body parts
    #[serde(skip_serializing_if = "is_false")]
    pub include_body: bool,
    /// Include IMAP flags
    #[serde(skip_serializing_if = "is_false")]
    pub include_flags: bool,
    /// Include headers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_headers: Option<IncludeHeaders>,
}

impl GetMessageRequest {
    /// Create a new request
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the folder separator
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Include body parts, optionally only of one MIME type
    pub fn include_body(mut self, body_type: impl Into<String>) -> Self {
        self.include_body = true;
        self.body_type = body_type.into();
        self
    }

    /// Include IMAP flags
    pub fn include_flags(mut self) -> Self {
        self.include_flags = true;
        self
    }

    /// Include headers
    pub fn include_headers(mut self, mode: IncludeHeaders) -> Self {
        self.include_headers = Some(mode);
        self
    }
}

/// Options for listing messages
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListMessagesRequest {
    /// Per-message options
    #[serde(flatten)]
    pub message: GetMessageRequest,
    /// Maximum number of results
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: u32,
    /// Results to skip
    #[serde(skip_serializing_if = "is_zero")]
    pub offset: u32,
}

impl ListMessagesRequest {
    /// Create a new request
    pub fn new() -> Self {
        Self::default()
    }

    /// Set per-message options
    pub fn message(mut self, message: GetMessageRequest) -> Self {
        self.message = message;
        self
    }

    /// Set result limit
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = n;
        self
    }

    /// Set result offset
    pub fn offset(mut self, n: u32) -> Self {
        self.offset = n;
        self
    }
}

/// Options for fetching message bodies
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageBodyRequest {
    /// Folder separator
    #[serde(skip_serializing_if = "String::is_empty")]
    pub delimiter: String,
    /// Only parts of this MIME type
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub body_type: String,
}

impl MessageBodyRequest {
    /// Create a new request
    pub fn new() -> Self {
        Self::default()
    }

    /// Only parts of this MIME type
    pub fn body_type(mut self, body_type: impl Into<String>) -> Self {
        self.body_type = body_type.into();
        self
    }
}

/// Options for fetching message headers
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageHeadersRequest {
    /// Folder separator
    #[serde(skip_serializing_if = "String::is_empty")]
    pub delimiter: String,
    /// Return the raw header block instead of a map
    #[serde(skip_serializing_if = "is_false")]
    pub raw: bool,
}

impl MessageHeadersRequest {
    /// Create a new request
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the raw header block
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }
}

/// Options for fetching one attachment
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttachmentRequest {
    /// Folder separator
    #[serde(skip_serializing_if = "String::is_empty")]
    pub delimiter: String,
    /// Return a download link instead of the content
    #[serde(skip_serializing_if = "is_false")]
    pub as_link: bool,
}

impl AttachmentRequest {
    /// Create a new request
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a download link
    pub fn as_link(mut self) -> Self {
        self.as_link = true;
        self
    }
}

/// Request to move a message to another folder
#[derive(Debug, Clone, Serialize)]
pub struct MoveMessageRequest {
    /// Destination folder
    pub new_folder_id: String,
    /// Folder separator
    #[serde(skip_serializing_if = "String::is_empty")]
    pub delimiter: String,
}

impl MoveMessageRequest {
    /// Create a new request
    pub fn new(new_folder_id: impl Into<String>) -> Self {
        Self {
            new_folder_id: new_folder_id.into(),
            delimiter: String::new(),
        }
    }

    /// Set the folder separator
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }
}
