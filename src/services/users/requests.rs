//! Request types for users service.

use crate::observability::Redacted;
use crate::request::{is_false, is_zero};
use serde::Serialize;
use std::fmt;

/// Request to list users
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListUsersRequest {
    /// Only users with this address
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    /// Only users with an account in this status
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// `1` for users whose accounts are all OK, `0` for the others
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status_ok: String,
    /// Maximum number of results
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: u32,
    /// Results to skip
    #[serde(skip_serializing_if = "is_zero")]
    pub offset: u32,
}

impl ListUsersRequest {
    /// Create a new request
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by address
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Filter by account status
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Filter by overall account health
    pub fn status_ok(mut self, ok: bool) -> Self {
        self.status_ok = if ok { "1" } else { "0" }.to_string();
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

/// Request to create a user, optionally with a first email account.
///
/// An empty request creates a user with no accounts. To link an account at
/// the same time set `email`, `server`, `username`, `use_ssl`, `port` and
/// `account_type`, plus either `password` or the OAuth pair.
#[derive(Clone, Default, Serialize)]
pub struct CreateUserRequest {
    /// Account address
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    /// Mail server host
    #[serde(skip_serializing_if = "String::is_empty")]
    pub server: String,
    /// Login name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    /// Server type, e.g. `IMAP`
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub account_type: String,
    /// Whether to use TLS
    #[serde(skip_serializing_if = "is_false")]
    pub use_ssl: bool,
    /// Server port
    #[serde(skip_serializing_if = "is_zero")]
    pub port: u16,
    /// OAuth refresh token
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider_refresh_token: String,
    /// OAuth client key
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider_consumer_key: String,
    /// Account password
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Per-account status callback
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status_callback_url: String,
    /// Existing account to migrate
    #[serde(skip_serializing_if = "String::is_empty")]
    pub migrate_account_id: String,
    /// First name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    /// Last name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
}

impl CreateUserRequest {
    /// Create a user without accounts
    pub fn new() -> Self {
        Self::default()
    }

    /// Link an account at creation time
    pub fn account(
        mut self,
        email: impl Into<String>,
        server: impl Into<String>,
        username: impl Into<String>,
        use_ssl: bool,
        port: u16,
    ) -> Self {
        self.email = email.into();
        self.server = server.into();
        self.username = username.into();
        self.account_type = "IMAP".to_string();
        self.use_ssl = use_ssl;
        self.port = port;
        self
    }

    /// Authenticate the account with a password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Authenticate the account with OAuth
    pub fn oauth(
        mut self,
        refresh_token: impl Into<String>,
        consumer_key: impl Into<String>,
    ) -> Self {
        self.provider_refresh_token = refresh_token.into();
        self.provider_consumer_key = consumer_key.into();
        self
    }

    /// Set the user's name
    pub fn name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Set the status callback
    pub fn status_callback_url(mut self, url: impl Into<String>) -> Self {
        self.status_callback_url = url.into();
        self
    }

    /// Migrate an existing account
    pub fn migrate_account_id(mut self, id: impl Into<String>) -> Self {
        self.migrate_account_id = id.into();
        self
    }
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("email", &self.email)
            .field("server", &self.server)
            .field("username", &self.username)
            .field("account_type", &self.account_type)
            .field("use_ssl", &self.use_ssl)
            .field("port", &self.port)
            .field("provider_refresh_token", &Redacted::new(()))
            .field("provider_consumer_key", &self.provider_consumer_key)
            .field("password", &Redacted::new(()))
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

/// Request to rename a user
#[derive(Debug, Clone, Serialize)]
pub struct ModifyUserRequest {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
}

impl ModifyUserRequest {
    /// Create a new request
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}
