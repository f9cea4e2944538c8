//! Error types for the Context.IO Lite client.
//!
//! Every facade call returns [`LiteResult`]. Transport failures, non-2xx
//! statuses, undecodable bodies and `success=false` acknowledgements are
//! separate variants so callers can tell "the server returned garbage" from
//! "the server is unreachable".

use thiserror::Error;

/// Result type for Context.IO Lite operations
pub type LiteResult<T> = Result<T, LiteError>;

/// Root error type for the Context.IO Lite client
#[derive(Error, Debug)]
pub enum LiteError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Request could not be built
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Transport-level failure (connection, DNS, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Non-2xx HTTP status
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response payload
        body: String,
    },

    /// Response body did not match any expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// HTTP 200 with `success: false`
    #[error("{operation} was not successful: {message}")]
    Application {
        /// Facade operation that was acknowledged as failed
        operation: &'static str,
        /// Detail returned by the service, if any
        message: String,
    },

    /// Local connect token check failed
    #[error("Connect token error: {0}")]
    ConnectToken(#[from] ConnectTokenError),

    /// No email account matched the requested address
    #[error("No email account matching {email}")]
    EmailAccountNotFound {
        /// Address that was searched for
        email: String,
    },
}

impl LiteError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CIO_CONFIG",
            Self::Request(_) => "CIO_REQUEST",
            Self::Network(_) => "CIO_NETWORK",
            Self::Status { .. } => "CIO_STATUS",
            Self::Decode(_) => "CIO_DECODE",
            Self::Application { .. } => "CIO_APPLICATION",
            Self::ConnectToken(_) => "CIO_CONNECT_TOKEN",
            Self::EmailAccountNotFound { .. } => "CIO_ACCOUNT_NOT_FOUND",
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Informational only: the pipeline never consults this, the
    /// post-request hook decides.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(NetworkError::Timeout)
            | Self::Network(NetworkError::ConnectionFailed { .. })
            | Self::Network(NetworkError::DnsResolutionFailed { .. }) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Get HTTP status code if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw payload attached to a status error
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Missing API key or secret
    #[error("API key and secret are required")]
    MissingCredential,

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(String),
}

/// Request building errors
#[derive(Error, Debug)]
pub enum RequestError {
    /// Parameters could not be encoded
    #[error("Invalid parameters: {message}")]
    InvalidParameters {
        /// Error message
        message: String,
    },

    /// Final URL could not be parsed
    #[error("Invalid URL: {message}")]
    InvalidUrl {
        /// Error message
        message: String,
    },

    /// Identifier that would be read as a relative path step
    #[error("Invalid path segment: {segment:?}")]
    InvalidPathSegment {
        /// The rejected identifier
        segment: String,
    },

    /// Header value rejected by the HTTP layer
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Error message
        message: String,
    },
}

/// Network errors
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    /// Connection failed
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message
        message: String,
    },

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// DNS resolution failed
    #[error("DNS resolution failed: {message}")]
    DnsResolutionFailed {
        /// Error message
        message: String,
    },

    /// Reading or releasing the response body failed
    #[error("Body error: {message}")]
    Body {
        /// Error message
        message: String,
    },

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_connect() {
            NetworkError::ConnectionFailed {
                message: err.to_string(),
            }
        } else if err.is_body() || err.is_decode() {
            NetworkError::Body {
                message: err.to_string(),
            }
        } else {
            NetworkError::Http(err.to_string())
        }
    }
}

/// Response decoding errors
#[derive(Error, Debug)]
pub enum DecodeError {
    /// JSON deserialization error
    #[error("Deserialization error: {message}")]
    Deserialization {
        /// Error message
        message: String,
    },

    /// Payload had a shape none of the known variants accept
    #[error("Unexpected shape: {message}")]
    UnexpectedShape {
        /// Error message
        message: String,
    },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Deserialization {
            message: err.to_string(),
        }
    }
}

/// Failures of the local connect token check
#[derive(Error, Debug)]
pub enum ConnectTokenError {
    /// Token was never redeemed
    #[error("Connect token {token} has not been used")]
    NotUsed {
        /// Token value
        token: String,
    },

    /// Token was redeemed for a different address
    #[error("Connect token has no email account for {email}")]
    AccountMissing {
        /// Address that was expected
        email: String,
    },

    /// Linked account is not in a healthy state
    #[error("Email account {email} has status {status}")]
    AccountNotOk {
        /// Linked address
        email: String,
        /// Status reported by the service
        status: String,
    },
}
